use std::{
    io::{self, Write},
    sync::Arc,
};

use tokio::sync::mpsc;
use tracing::debug;

use super::formatting::{format_error, format_field, format_hint, format_reply};
use crate::{
    bootstrap::{Presenter, UserAction},
    provider::{Provider, SmsCommand},
};

/// Answers to the questions the bootstrap may ask, taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptAnswers {
    /// Enable a disabled modem without asking
    pub enable: bool,
    /// Provider to use as `(country, name)` when it cannot be determined
    pub provider: Option<(String, String)>,
}

/// Non-interactive presenter for a one-shot command.
///
/// Prompts are answered from [`PromptAnswers`]; a prompt without an answer
/// prints what flag to pass and ends the session.
pub struct TerminalPresenter<W: Write + Send = io::Stdout> {
    actions: mpsc::UnboundedSender<UserAction>,
    answers: PromptAnswers,
    out: W,
}

impl TerminalPresenter {
    /// Creates a presenter printing to stdout.
    pub fn new(actions: mpsc::UnboundedSender<UserAction>, answers: PromptAnswers) -> Self {
        Self::with_output(actions, answers, io::stdout())
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    /// Creates a presenter printing to `out`.
    pub fn with_output(
        actions: mpsc::UnboundedSender<UserAction>,
        answers: PromptAnswers,
        out: W,
    ) -> Self {
        Self {
            actions,
            answers,
            out,
        }
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn send(&self, action: UserAction) {
        debug!(?action, "Answering prompt");
        let _ = self.actions.send(action);
    }

    fn sms_hint(&mut self, sms: Option<&SmsCommand>) {
        if let Some(sms) = sms {
            self.line(&format_hint(&format!(
                "Try sending \"{}\" by SMS to {}",
                sms.text, sms.number
            )));
        }
    }

    fn select_or_quit(&mut self) {
        // Answer once; a rejected choice comes back here and must not loop.
        match self.answers.provider.take() {
            Some((country, name)) => self.send(UserAction::SelectProvider { country, name }),
            None => {
                self.line(&format_hint(
                    "Pass --country CC --provider NAME to choose the provider",
                ));
                self.send(UserAction::Quit);
            }
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn show_provider_assistant(&mut self, candidates: Option<&[Arc<Provider>]>) {
        if let Some(candidates) = candidates {
            if self.answers.provider.is_none() {
                self.line("Several providers match this SIM:");
                for provider in candidates {
                    self.line(&format!("  {} {}", provider.country, provider.name));
                }
            }
        }
        self.select_or_quit();
    }

    fn show_provider_unknown(&mut self, mcc: &str, mnc: &str) {
        self.line(&format!(
            "Network {mcc}/{mnc} is not in the provider database"
        ));
        self.select_or_quit();
    }

    fn show_modem_enable_prompt(&mut self) {
        if self.answers.enable {
            self.line("Enabling modem");
            self.send(UserAction::ConfirmEnable);
        } else {
            self.line(&format_hint("The modem is disabled; pass --enable to enable it"));
            self.send(UserAction::DeclineEnable);
            self.send(UserAction::Quit);
        }
    }

    fn show_no_modem_found(&mut self) {
        self.line(&format_error("No modem found"));
        self.send(UserAction::Quit);
    }

    fn show_modem_error(&mut self, message: &str) {
        self.line(&format_error(message));
    }

    fn show_balance_info_missing(&mut self, provider: &Provider) {
        self.line(&format_error(&format!(
            "No idea how to fetch the balance for {provider}"
        )));
        self.sms_hint(provider.sms_balance_check.as_ref());
        self.send(UserAction::Quit);
    }

    fn show_top_up_info_missing(&mut self, provider: &Provider) {
        self.line(&format_error(&format!("No idea how to top up {provider}")));
        self.sms_hint(provider.sms_top_up.as_ref());
        self.send(UserAction::Quit);
    }

    fn update_provider_name(&mut self, name: &str) {
        self.line(&format_field("Provider", name));
    }

    fn update_top_up_code_length(&mut self, length: usize) {
        self.line(&format_field("Top-up code length", &length.to_string()));
    }

    fn update_balance(&mut self, balance: &str, timestamp: &str) {
        self.line(&format_field("Balance", &format_reply(balance)));
        self.line(&format_field("Updated", timestamp));
    }

    fn update_top_up_reply(&mut self, reply: &str) {
        self.line(&format_field("Top-up", &format_reply(reply)));
    }
}
