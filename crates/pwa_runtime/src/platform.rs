//! Runtime environment classification.
//!
//! Every predicate queries the source afresh; nothing is cached because viewport, display mode,
//! and navigation change while the page is open. The user-agent heuristics are also exposed as
//! plain string functions so each one can be checked in isolation.

use pwa_host::{EnvironmentSource, PageLocation};
use serde::{Deserialize, Serialize};

/// Viewport width at or below which a device is treated as mobile.
pub const MOBILE_MAX_VIEWPORT_PX: f64 = 768.0;

const MOBILE_UA_KEYWORDS: [&str; 8] = [
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "windows phone",
    "webos",
    "mobile",
];

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];
const DEV_SERVER_PORT: &str = "4200";

/// Query parameters that mark a launch from the installed app's start URL.
const INSTALL_MARKER_KEYS: [&str; 2] = ["source", "utm_source"];
const INSTALL_MARKER_VALUE: &str = "pwa";

/// Returns whether `user_agent` names a mobile platform.
pub fn user_agent_is_mobile(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_UA_KEYWORDS.iter().any(|keyword| ua.contains(keyword))
}

/// Mobile when the user agent says so, the viewport is narrow, or touch input exists.
pub fn is_mobile_profile(user_agent: &str, viewport_width: Option<f64>, touch: bool) -> bool {
    user_agent_is_mobile(user_agent)
        || viewport_width.is_some_and(|width| width <= MOBILE_MAX_VIEWPORT_PX)
        || touch
}

/// Safari on iOS. Chrome and Firefox on iOS carry Safari tokens too and are excluded.
pub fn user_agent_is_ios_safari(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ua.contains("safari")
        && ua.contains("mobile")
        && !ua.contains("chrome")
        && !ua.contains("crios")
        && !ua.contains("fxios")
}

/// Chrome on Android outside an embedded WebView.
pub fn user_agent_is_android_chrome(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ua.contains("android") && ua.contains("chrome") && !user_agent_is_webview(user_agent)
}

/// Embedded WebView heuristic: the `wv` token, or `version` together with `mobile`.
pub fn user_agent_is_webview(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    let wv_token = ua
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == "wv");
    wv_token || (ua.contains("version") && ua.contains("mobile"))
}

/// Local host names or the dev-server port.
pub fn location_is_local_development(location: &PageLocation) -> bool {
    LOCAL_HOSTS.contains(&location.hostname.as_str()) || location.port == DEV_SERVER_PORT
}

/// Secure when the browser says so, the host is local, or the page was opened from disk.
pub fn location_is_secure(secure_flag: bool, location: Option<&PageLocation>) -> bool {
    secure_flag
        || location.is_some_and(|location| {
            LOCAL_HOSTS.contains(&location.hostname.as_str()) || location.protocol == "file:"
        })
}

/// Returns whether a query string carries `source=pwa` or `utm_source=pwa`.
pub fn search_has_install_marker(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| INSTALL_MARKER_KEYS.contains(&key) && value == INSTALL_MARKER_VALUE)
}

pub fn is_browser(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser()
}

pub fn is_mobile_device(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser()
        && is_mobile_profile(
            &environment.user_agent(),
            environment.viewport_width(),
            environment.has_touch_support(),
        )
}

pub fn is_ios_safari(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser() && user_agent_is_ios_safari(&environment.user_agent())
}

pub fn is_android_chrome(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser() && user_agent_is_android_chrome(&environment.user_agent())
}

pub fn is_in_webview(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser() && user_agent_is_webview(&environment.user_agent())
}

pub fn is_secure_context(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser()
        && location_is_secure(
            environment.secure_context_flag(),
            environment.location().as_ref(),
        )
}

pub fn has_service_worker_support(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser() && environment.has_service_worker_api()
}

pub fn has_valid_manifest_link(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser() && environment.has_manifest_link()
}

pub fn is_local_development(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser()
        && environment
            .location()
            .is_some_and(|location| location_is_local_development(&location))
}

/// Display-mode standalone, or the iOS home-screen flag.
pub fn is_standalone(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser()
        && (environment.display_mode_standalone() || environment.navigator_standalone())
}

pub fn has_install_url_marker(environment: &dyn EnvironmentSource) -> bool {
    environment.is_browser()
        && environment
            .location()
            .is_some_and(|location| search_has_install_marker(&location.search))
}

/// Environment signals that the page runs as the installed app.
///
/// The WebView heuristic is skipped on iOS Safari, whose user agent always matches it.
pub fn environment_reports_installed(environment: &dyn EnvironmentSource) -> bool {
    is_standalone(environment)
        || (is_in_webview(environment) && !is_ios_safari(environment))
        || has_install_url_marker(environment)
}

/// Coarse platform category used to pick an install path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    /// No browser (server rendering, native tests).
    Server,
    /// Safari on iOS: no install API, share-sheet instructions only.
    IosSafari,
    /// Embedded WebView inside a native shell.
    WebView,
    /// Any other browser.
    StandardBrowser,
}

pub fn classify_platform(environment: &dyn EnvironmentSource) -> PlatformKind {
    if !environment.is_browser() {
        PlatformKind::Server
    } else if is_ios_safari(environment) {
        PlatformKind::IosSafari
    } else if is_in_webview(environment) {
        PlatformKind::WebView
    } else {
        PlatformKind::StandardBrowser
    }
}

/// Whether the app is installed, could be installed, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppInstallState {
    Installed,
    Installable,
    NotInstallable,
}

#[cfg(test)]
mod tests {
    use pwa_host::EnvironmentSnapshot;

    use super::*;

    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";
    const ANDROID_WEBVIEW: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/124.0.0.0 Mobile Safari/537.36";
    const IOS_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const IOS_CHROME: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/124.0.6367.88 Mobile/15E148 Safari/604.1";
    const IOS_FIREFOX: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) FxiOS/125.0 Mobile/15E148 Safari/605.1.15";

    #[test]
    fn mobile_detection_uses_keywords_width_or_touch() {
        assert!(user_agent_is_mobile(ANDROID_CHROME));
        assert!(user_agent_is_mobile("Opera/9.80 (BlackBerry; U; BlackBerry 9800)"));
        assert!(!user_agent_is_mobile(DESKTOP_CHROME));

        assert!(is_mobile_profile(DESKTOP_CHROME, Some(768.0), false));
        assert!(!is_mobile_profile(DESKTOP_CHROME, Some(769.0), false));
        assert!(is_mobile_profile(DESKTOP_CHROME, Some(1440.0), true));
        assert!(!is_mobile_profile(DESKTOP_CHROME, None, false));
    }

    #[test]
    fn ios_safari_excludes_chrome_and_firefox_on_ios() {
        assert!(user_agent_is_ios_safari(IOS_SAFARI));
        assert!(!user_agent_is_ios_safari(IOS_CHROME));
        assert!(!user_agent_is_ios_safari(IOS_FIREFOX));
        assert!(!user_agent_is_ios_safari(DESKTOP_CHROME));
    }

    #[test]
    fn webview_heuristic_matches_wv_token_or_version_mobile() {
        assert!(user_agent_is_webview(ANDROID_WEBVIEW));
        assert!(user_agent_is_webview(IOS_SAFARI));
        assert!(!user_agent_is_webview(ANDROID_CHROME));
        assert!(!user_agent_is_webview(DESKTOP_CHROME));
        assert!(!user_agent_is_webview("Mozilla/5.0 (X11; Linux x86_64) wvx/1.0"));
    }

    #[test]
    fn android_chrome_is_not_a_webview() {
        assert!(user_agent_is_android_chrome(ANDROID_CHROME));
        assert!(!user_agent_is_android_chrome(ANDROID_WEBVIEW));
        assert!(!user_agent_is_android_chrome(IOS_CHROME));
    }

    #[test]
    fn secure_and_local_development_locations() {
        let local = PageLocation::new("http:", "localhost", "8080", "");
        let dev_port = PageLocation::new("http:", "192.168.1.20", "4200", "");
        let remote = PageLocation::new("http:", "eats.example", "", "");
        let file = PageLocation::new("file:", "", "", "");

        assert!(location_is_local_development(&local));
        assert!(location_is_local_development(&dev_port));
        assert!(!location_is_local_development(&remote));

        assert!(location_is_secure(false, Some(&local)));
        assert!(location_is_secure(false, Some(&file)));
        assert!(!location_is_secure(false, Some(&remote)));
        assert!(location_is_secure(true, Some(&remote)));
        assert!(!location_is_secure(false, None));
    }

    #[test]
    fn install_marker_requires_exact_pair() {
        assert!(search_has_install_marker("?source=pwa"));
        assert!(search_has_install_marker("?ref=x&utm_source=pwa"));
        assert!(!search_has_install_marker("?source=pwa-beta"));
        assert!(!search_has_install_marker("?xsource=pwa"));
        assert!(!search_has_install_marker(""));
    }

    #[test]
    fn non_browser_environment_is_conservative() {
        let env = EnvironmentSnapshot::default();
        assert!(!is_mobile_device(&env));
        assert!(!is_secure_context(&env));
        assert!(!is_local_development(&env));
        assert!(!environment_reports_installed(&env));
        assert_eq!(classify_platform(&env), PlatformKind::Server);
    }

    #[test]
    fn installed_detection_ignores_webview_heuristic_on_ios_safari() {
        let mut env = EnvironmentSnapshot::browser(IOS_SAFARI, "eats.example", 390.0);
        assert!(!environment_reports_installed(&env));
        assert_eq!(classify_platform(&env), PlatformKind::IosSafari);

        env.navigator_standalone = true;
        assert!(environment_reports_installed(&env));

        let webview = EnvironmentSnapshot::browser(ANDROID_WEBVIEW, "eats.example", 412.0);
        assert!(environment_reports_installed(&webview));
        assert_eq!(classify_platform(&webview), PlatformKind::WebView);

        let mut marked = EnvironmentSnapshot::browser(DESKTOP_CHROME, "eats.example", 1440.0);
        marked.location = Some(PageLocation::new("https:", "eats.example", "", "?source=pwa"));
        assert!(environment_reports_installed(&marked));
        assert_eq!(classify_platform(&marked), PlatformKind::StandardBrowser);
    }
}
