//! Recording gateways for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{EmailGateway, EmailMessage, SmsGateway};

/// What a fake gateway does when asked to send.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail,
    Panic,
    /// Succeeds after sleeping, to prove the other channels are not serialized behind it.
    Delay(Duration),
}

pub struct FakeEmailGateway {
    behavior: Box<dyn Fn(&EmailMessage) -> Behavior + Send + Sync>,
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl FakeEmailGateway {
    pub fn new(behavior: Behavior) -> Self {
        Self::with(move |_| behavior)
    }

    /// Chooses the behavior per message, e.g. to fail only the applicant copy.
    pub fn with(behavior: impl Fn(&EmailMessage) -> Behavior + Send + Sync + 'static) -> Self {
        Self {
            behavior: Box::new(behavior),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("fake mutex poisoned").clone()
    }
}

#[async_trait]
impl EmailGateway for FakeEmailGateway {
    async fn send(&self, message: EmailMessage) -> bool {
        let behavior = (self.behavior)(&message);
        self.sent.lock().expect("fake mutex poisoned").push(message);
        act(behavior).await
    }
}

pub struct FakeSmsGateway {
    behavior: Behavior,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl FakeSmsGateway {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("fake mutex poisoned").clone()
    }
}

#[async_trait]
impl SmsGateway for FakeSmsGateway {
    async fn send(&self, to: &str, text: &str) -> bool {
        self.sent
            .lock()
            .expect("fake mutex poisoned")
            .push((to.to_string(), text.to_string()));
        act(self.behavior).await
    }
}

async fn act(behavior: Behavior) -> bool {
    match behavior {
        Behavior::Succeed => true,
        Behavior::Fail => false,
        Behavior::Panic => panic!("gateway exploded"),
        Behavior::Delay(d) => {
            tokio::time::sleep(d).await;
            true
        }
    }
}
