//! In-process gateway for tests in this and dependent crates.

use crate::error::GatewayError;
use crate::gateway::SmsGateway;
use ashvault_common::BoxFuture;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A gateway call as seen by [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub template_id: String,
    pub variables_values: String,
}

/// Plays back queued results, then succeeds with `msg-<n>`.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    sent: Mutex<Vec<SentMessage>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(results: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Every later call fails with `error`.
    pub fn failing(error: GatewayError) -> Self {
        let gateway = Self::new();
        gateway
            .script
            .lock()
            .unwrap()
            .extend(std::iter::repeat(Err(error)).take(1024));
        gateway
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl SmsGateway for ScriptedGateway {
    fn send<'a>(
        &'a self,
        recipient: &'a str,
        template_id: &'a str,
        variables_values: &'a str,
    ) -> BoxFuture<'a, String, GatewayError> {
        Box::pin(async move {
            let n = {
                let mut sent = self.sent.lock().unwrap();
                sent.push(SentMessage {
                    recipient: recipient.to_string(),
                    template_id: template_id.to_string(),
                    variables_values: variables_values.to_string(),
                });
                sent.len()
            };
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(format!("msg-{}", n)))
        })
    }
}
