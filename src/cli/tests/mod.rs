//! Unit tests for CLI module
//!
//! Tests argument parsing, prompt answering and formatting.
//! No modem or provider database involved.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use crate::{
    bootstrap::{BootstrapPhase, Presenter, SessionEvent, UserAction},
    cli::{
        Cli, CliError, Commands, PromptAnswers, TerminalPresenter,
        formatting::{Colors, format_country, format_error, format_progress},
        service::SessionOutcome,
    },
    provider::{Provider, SmsCommand},
    services::modem::Operation,
};

fn presenter(
    answers: PromptAnswers,
) -> (
    TerminalPresenter<Vec<u8>>,
    mpsc::UnboundedReceiver<UserAction>,
) {
    let (actions, receiver) = mpsc::unbounded_channel();
    (
        TerminalPresenter::with_output(actions, answers, Vec::new()),
        receiver,
    )
}

fn drain(receiver: &mut mpsc::UnboundedReceiver<UserAction>) -> Vec<UserAction> {
    let mut actions = Vec::new();
    while let Ok(action) = receiver.try_recv() {
        actions.push(action);
    }
    actions
}

fn printed(presenter: &TerminalPresenter<Vec<u8>>) -> String {
    String::from_utf8_lossy(presenter.output()).into_owned()
}

#[test]
fn parses_top_up_with_flags_after_the_command() {
    let cli = Cli::try_parse_from([
        "prepaid-manager",
        "top-up",
        "1234567890",
        "--enable",
        "--country",
        "de",
        "--provider",
        "Example",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Commands::TopUp {
            code: "1234567890".to_string()
        }
    );
    assert_eq!(
        cli.answers(),
        PromptAnswers {
            enable: true,
            provider: Some(("de".to_string(), "Example".to_string())),
        }
    );
}

#[test]
fn country_requires_provider() {
    let result = Cli::try_parse_from(["prepaid-manager", "--country", "de", "balance"]);
    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["prepaid-manager"]).is_err());
}

#[test]
fn parses_listing_commands() {
    let cli = Cli::try_parse_from(["prepaid-manager", "providers", "at"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Providers {
            country: "at".to_string()
        }
    );
    assert!(!cli.debug);
    assert_eq!(cli.answers(), PromptAnswers::default());
}

#[test]
fn enable_prompt_without_flag_declines_and_quits() {
    let (mut presenter, mut receiver) = presenter(PromptAnswers::default());

    presenter.show_modem_enable_prompt();

    assert_eq!(
        drain(&mut receiver),
        vec![UserAction::DeclineEnable, UserAction::Quit]
    );
    assert!(printed(&presenter).contains("--enable"));
}

#[test]
fn enable_prompt_with_flag_confirms() {
    let (mut presenter, mut receiver) = presenter(PromptAnswers {
        enable: true,
        provider: None,
    });

    presenter.show_modem_enable_prompt();

    assert_eq!(drain(&mut receiver), vec![UserAction::ConfirmEnable]);
}

#[test]
fn provider_answer_is_used_once() {
    let (mut presenter, mut receiver) = presenter(PromptAnswers {
        enable: false,
        provider: Some(("de".to_string(), "Example".to_string())),
    });

    presenter.show_provider_unknown("262", "99");
    presenter.show_provider_assistant(None);

    assert_eq!(
        drain(&mut receiver),
        vec![
            UserAction::SelectProvider {
                country: "de".to_string(),
                name: "Example".to_string(),
            },
            UserAction::Quit,
        ]
    );
}

#[test]
fn ambiguous_providers_are_listed_when_unanswered() {
    let (mut presenter, mut receiver) = presenter(PromptAnswers::default());
    let candidates = vec![
        Arc::new(Provider::new("de", "First")),
        Arc::new(Provider::new("de", "Second")),
    ];

    presenter.show_provider_assistant(Some(&candidates));

    let output = printed(&presenter);
    assert!(output.contains("de First"));
    assert!(output.contains("de Second"));
    assert!(output.contains("--provider"));
    assert_eq!(drain(&mut receiver), vec![UserAction::Quit]);
}

#[test]
fn missing_commands_end_the_session() {
    let (mut presenter, mut receiver) = presenter(PromptAnswers::default());
    let provider = Provider::new("de", "Example");

    presenter.show_balance_info_missing(&provider);
    presenter.show_top_up_info_missing(&provider);
    presenter.show_no_modem_found();

    assert_eq!(
        drain(&mut receiver),
        vec![UserAction::Quit, UserAction::Quit, UserAction::Quit]
    );
    assert!(printed(&presenter).contains("Example (de)"));
}

#[test]
fn sms_alternative_is_suggested() {
    let (mut presenter, _receiver) = presenter(PromptAnswers::default());
    let provider = Provider {
        sms_balance_check: Some(SmsCommand {
            number: "22000".to_string(),
            text: "BAL".to_string(),
        }),
        ..Provider::new("de", "Sms Only")
    };

    presenter.show_balance_info_missing(&provider);

    assert!(printed(&presenter).contains("\"BAL\" by SMS to 22000"));
}

#[test]
fn updates_are_printed_without_actions() {
    let (mut presenter, mut receiver) = presenter(PromptAnswers::default());

    presenter.update_provider_name("Example");
    presenter.update_balance("Balance: 5 EUR", "Sun Oct 18 14:02:11 2026");
    presenter.update_top_up_reply("Voucher accepted");
    presenter.show_modem_error("Ussd failed: busy");

    let output = printed(&presenter);
    assert!(output.contains("Example"));
    assert!(output.contains("Balance: 5 EUR"));
    assert!(output.contains("Sun Oct 18 14:02:11 2026"));
    assert!(output.contains("Voucher accepted"));
    assert!(output.contains("Ussd failed: busy"));
    assert!(drain(&mut receiver).is_empty());
}

#[test]
fn format_country_falls_back_to_code() {
    assert_eq!(format_country(None, "xx"), "xx");

    let named = format_country(Some("Germany"), "de");
    assert!(named.starts_with("de  "));
    assert!(named.contains("Germany"));
}

#[test]
fn format_error_is_wrapped_in_color_codes() {
    let formatted = format_error("boom");
    assert!(formatted.starts_with(Colors::BOLD));
    assert!(formatted.ends_with(Colors::RESET));
    assert!(formatted.contains("boom"));
}

#[test]
fn progress_line_names_what_the_modem_is_doing() {
    assert!(format_progress(Operation::UssdInitiate).contains("Waiting for the network..."));
    assert!(format_progress(Operation::Enumerate).contains("Looking for modems..."));
}

#[test]
fn session_issues_request_once_ready_and_quits_on_reply() {
    let mut outcome = SessionOutcome::new(Some(UserAction::FetchBalance));

    assert!(outcome.on_phase(BootstrapPhase::Discovering).unwrap().is_none());
    assert_eq!(
        outcome.on_event(SessionEvent::ModemError("Enumerate failed: gone".to_string())),
        None
    );
    assert_eq!(
        outcome.on_phase(BootstrapPhase::Ready).unwrap(),
        Some(UserAction::FetchBalance)
    );
    assert!(outcome.on_phase(BootstrapPhase::Ready).unwrap().is_none());

    let reply = SessionEvent::BalanceChanged {
        balance: "5 EUR".to_string(),
        timestamp: "Sun Oct 18 14:02:11 2026".to_string(),
    };
    assert_eq!(outcome.on_event(reply), Some(UserAction::Quit));
    assert_eq!(outcome.finish(BootstrapPhase::Ready).unwrap(), "");
}

#[test]
fn session_ending_in_modem_error_fails() {
    let mut outcome = SessionOutcome::new(Some(UserAction::TopUp {
        code: "1234".to_string(),
    }));
    outcome.on_phase(BootstrapPhase::Ready).unwrap();

    let error = SessionEvent::ModemError("UssdInitiate failed: busy".to_string());
    assert_eq!(outcome.on_event(error), Some(UserAction::Quit));

    let result = outcome.finish(BootstrapPhase::Ready);
    assert!(matches!(result, Err(CliError::ServiceError(message)) if message == "UssdInitiate failed: busy"));
}

#[test]
fn status_quits_as_soon_as_ready() {
    let mut outcome = SessionOutcome::new(None);

    assert_eq!(
        outcome.on_phase(BootstrapPhase::Ready).unwrap(),
        Some(UserAction::Quit)
    );
    assert!(outcome.finish(BootstrapPhase::Ready).is_ok());
}

#[test]
fn session_that_never_gets_ready_fails() {
    let mut outcome = SessionOutcome::new(Some(UserAction::FetchBalance));

    assert!(outcome.on_phase(BootstrapPhase::Failed).is_err());
    assert!(matches!(
        outcome.finish(BootstrapPhase::AwaitingEnable),
        Err(CliError::ServiceError(message)) if message.contains("waiting to enable modem")
    ));
}
