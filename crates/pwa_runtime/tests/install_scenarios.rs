use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::executor::block_on;
use leptos::{create_effect, create_runtime, SignalGet};
use pretty_assertions::assert_eq;
use pwa_host::{
    EnvironmentSnapshot, InstallChoice, InstallPromptHandle, MemoryHost, PwaEvent, PwaStore,
    SimulatedInstallPrompt, TaskScheduler, VersionEvent,
};
use pwa_runtime::components::policy::{install_route, InstallRoute};
use pwa_runtime::storage::{DEV_INSTALLED_KEY, REMINDER_SHOWN_KEY, VISIT_COUNT_KEY};
use pwa_runtime::{
    AppInstallState, InstallOutcome, InstallRejection, PlatformKind, PwaConfig, PwaCoordinator,
    PwaMode,
};

const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";
const IOS_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";

const NOW_MS: u64 = 1_718_000_000_000;
const HOUR_MS: u64 = 60 * 60 * 1000;

fn production_host(user_agent: &str, width: f64) -> MemoryHost {
    let _ = create_runtime();
    MemoryHost::new(
        EnvironmentSnapshot::browser(user_agent, "eats.example", width),
        NOW_MS,
    )
}

fn started(host: &MemoryHost) -> PwaCoordinator {
    let coordinator = PwaCoordinator::new(host.services(), &PwaConfig::embedded());
    coordinator.start();
    coordinator
}

fn accepting_prompt() -> Rc<dyn InstallPromptHandle> {
    Rc::new(SimulatedInstallPrompt::resolving(InstallChoice::Accepted))
}

#[test]
fn scenario_a_desktop_production_never_offers_install() {
    let host = production_host(DESKTOP_CHROME, 1440.0);
    // Even a returning visitor with a captured prompt stays ineligible.
    host.store.save_value(VISIT_COUNT_KEY, "7").expect("seed visits");
    let coordinator = started(&host);
    host.install_prompts.fire_available(accepting_prompt());

    assert_eq!(coordinator.mode(), PwaMode::Production);
    assert!(!coordinator.can_install_app());
    assert_eq!(coordinator.app_install_state(), AppInstallState::NotInstallable);
    assert!(!coordinator.reminder_pending());

    host.scheduler.advance(Duration::from_secs(24 * 60 * 60));
    assert!(!coordinator.show_app_reminder().get());
    assert_eq!(host.store.peek(VISIT_COUNT_KEY).as_deref(), Some("7"));
}

#[test]
fn scenario_b_mobile_chrome_accepts_native_prompt() {
    let host = production_host(ANDROID_CHROME, 412.0);
    let coordinator = started(&host);
    let prompt = SimulatedInstallPrompt::resolving(InstallChoice::Accepted);
    host.install_prompts.fire_available(Rc::new(prompt.clone()));

    assert_eq!(host.events.emitted(), vec![PwaEvent::InstallAvailable]);
    assert!(coordinator.can_install_app());

    let outcome = InstallOutcome::from(block_on(coordinator.install_app()));
    assert_eq!(
        outcome,
        InstallOutcome {
            success: true,
            reason: None
        }
    );
    assert_eq!(prompt.prompt_count(), 1);
    assert!(!coordinator.can_install_app());
    assert!(coordinator.is_app_installed().get());
    assert!(!coordinator.show_app_reminder().get());

    // The platform confirms the install afterwards.
    host.install_prompts.fire_installed();
    assert_eq!(host.events.count(PwaEvent::Installed), 1);
}

#[test]
fn scenario_c_ios_safari_infers_installability_and_routes_to_instructions() {
    let host = production_host(IOS_SAFARI, 390.0);
    let coordinator = started(&host);

    assert_eq!(coordinator.platform_kind(), PlatformKind::IosSafari);
    assert!(coordinator.can_install_app());
    assert!(!coordinator.is_app_installed().get());
    assert_eq!(
        install_route(coordinator.platform_kind()),
        InstallRoute::ShareSheetInstructions
    );

    host.environment
        .update(|env| env.navigator_standalone = true);
    assert!(!coordinator.can_install_app());
    assert_eq!(coordinator.app_install_state(), AppInstallState::Installed);
}

#[test]
fn scenario_d_local_development_install_succeeds_after_a_microtask() {
    let host = MemoryHost::new(
        EnvironmentSnapshot::browser(DESKTOP_CHROME, "localhost", 1440.0),
        NOW_MS,
    );
    let coordinator = started(&host);
    assert_eq!(coordinator.mode(), PwaMode::Development);
    assert_eq!(host.store.peek(DEV_INSTALLED_KEY), None);

    let outcome = Rc::new(RefCell::new(None));
    {
        let coordinator = coordinator.clone();
        let outcome = outcome.clone();
        host.scheduler.spawn(Box::pin(async move {
            let result = coordinator.install_app().await;
            *outcome.borrow_mut() = Some(InstallOutcome::from(result));
        }));
    }
    assert_eq!(*outcome.borrow(), None);

    host.scheduler.run_until_stalled();
    assert_eq!(
        *outcome.borrow(),
        Some(InstallOutcome {
            success: true,
            reason: None
        })
    );
    assert_eq!(host.store.peek(DEV_INSTALLED_KEY).as_deref(), Some("true"));
    assert_eq!(host.events.count(PwaEvent::Installed), 1);

    // A fresh session honours the persisted flag.
    let next_session = started(&host);
    assert!(next_session.is_app_installed().get());
    assert!(!next_session.can_install_app());
}

#[test]
fn scenario_e_reminder_dismissed_an_hour_ago_stays_hidden() {
    let host = production_host(ANDROID_CHROME, 412.0);
    host.store.save_value(VISIT_COUNT_KEY, "3").expect("seed visits");
    host.store
        .save_value(REMINDER_SHOWN_KEY, &(NOW_MS - HOUR_MS).to_string())
        .expect("seed anchor");

    let coordinator = started(&host);
    coordinator.schedule_app_reminder();
    assert!(!coordinator.reminder_pending());

    host.scheduler.advance(Duration::from_secs(10 * 60));
    assert!(!coordinator.show_app_reminder().get());
}

#[test]
fn scenario_f_version_ready_emits_true_once_per_event() {
    let host = production_host(ANDROID_CHROME, 412.0);
    let coordinator = started(&host);
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        let update_available = coordinator.update_available();
        create_effect(move |_| seen.borrow_mut().push(update_available.get()));
    }

    host.updates.emit(VersionEvent::VersionDetected);
    host.updates.emit(VersionEvent::VersionReady);
    assert_eq!(*seen.borrow(), vec![false, true]);
}

#[test]
fn install_is_rejected_idempotently_once_installed() {
    let host = production_host(ANDROID_CHROME, 412.0);
    let coordinator = started(&host);
    host.install_prompts.fire_installed();

    for _ in 0..5 {
        host.install_prompts.fire_available(accepting_prompt());
        assert_eq!(
            block_on(coordinator.install_app()),
            Err(InstallRejection::AlreadyInstalled)
        );
    }
    assert_eq!(
        InstallOutcome::from(block_on(coordinator.install_app())).reason,
        Some("ALREADY_INSTALLED".to_string())
    );
}

#[test]
fn every_install_path_clears_reminder_and_capability() {
    // Native accept, native event, and development simulation.
    let accepted = production_host(ANDROID_CHROME, 412.0);
    let via_event = production_host(ANDROID_CHROME, 412.0);
    let simulated = MemoryHost::new(
        EnvironmentSnapshot::browser(ANDROID_CHROME, "127.0.0.1", 412.0),
        NOW_MS,
    );

    for host in [&accepted, &via_event, &simulated] {
        host.store.save_value(VISIT_COUNT_KEY, "5").expect("seed visits");
    }

    let a = started(&accepted);
    accepted.install_prompts.fire_available(accepting_prompt());
    assert!(a.reminder_pending());
    assert_eq!(block_on(a.install_app()), Ok(()));

    let b = started(&via_event);
    via_event.install_prompts.fire_available(accepting_prompt());
    via_event.install_prompts.fire_installed();

    let c = started(&simulated);
    simulated.scheduler.advance(Duration::from_secs(3));
    assert!(c.show_app_reminder().get());
    c.simulate_installation().expect("development mode");

    for (coordinator, host) in [(&a, &accepted), (&b, &via_event), (&c, &simulated)] {
        host.scheduler.advance(Duration::from_secs(120));
        assert!(!coordinator.can_install_app());
        assert!(!coordinator.show_app_reminder().get());
        assert!(coordinator.is_app_installed().get());
        assert!(!coordinator.reminder_pending());
    }
}

#[test]
fn dismissed_reminder_is_not_rescheduled_within_cooldown() {
    let host = production_host(ANDROID_CHROME, 412.0);
    host.store.save_value(VISIT_COUNT_KEY, "1").expect("seed visits");
    let coordinator = started(&host);
    host.scheduler.advance(Duration::from_secs(60));
    assert!(coordinator.show_app_reminder().get());

    coordinator.dismiss_app_reminder();
    for _ in 0..3 {
        coordinator.schedule_app_reminder();
        host.scheduler.advance(Duration::from_secs(60 * 60));
        assert!(!coordinator.show_app_reminder().get());
    }
}

#[test]
fn only_version_ready_flips_update_state_and_activation_needs_it() {
    let host = production_host(ANDROID_CHROME, 412.0);
    let coordinator = started(&host);

    block_on(coordinator.update_app());
    assert_eq!(host.updates.activate_calls(), 0);

    host.updates.emit(VersionEvent::NoNewVersionDetected);
    host.updates.emit(VersionEvent::VersionInstallationFailed {
        error: "disk full".to_string(),
    });
    host.updates.set_check_result(Ok(true));
    host.scheduler.advance(Duration::from_secs(30 * 60));
    assert_eq!(host.updates.check_calls(), 1);
    assert!(!coordinator.update_available().get());

    host.updates.emit(VersionEvent::VersionReady);
    block_on(coordinator.update_app());
    assert_eq!(host.updates.activate_calls(), 1);
    assert_eq!(host.updates.reloads(), 1);
}

#[test]
fn unavailable_storage_degrades_to_first_visit_defaults() {
    let host = production_host(ANDROID_CHROME, 412.0);
    host.store.set_fail_reads(true);
    host.store.set_fail_writes(true);

    let coordinator = started(&host);
    host.install_prompts.fire_available(accepting_prompt());
    coordinator.dismiss_app_reminder();
    coordinator.dismiss_install_prompt();

    assert!(coordinator.can_install_app());
    assert!(!coordinator.reminder_pending());
    assert!(coordinator.clear_pwa_data().is_err());
    assert_eq!(block_on(coordinator.install_app()), Ok(()));
}
