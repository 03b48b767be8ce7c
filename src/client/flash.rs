use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashMessages {
    pub success: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct FlashSlots {
    messages: FlashMessages,
    // Bumped on every write so an older timer never clears a newer message.
    generation: u64,
}

/// The transient message area. Each message clears itself after `ttl`.
#[derive(Debug, Clone)]
pub struct FlashBoard {
    slots: Arc<Mutex<FlashSlots>>,
    ttl: Duration,
}

impl FlashBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(FlashSlots::default())),
            ttl,
        }
    }

    pub async fn current(&self) -> FlashMessages {
        self.slots.lock().await.messages.clone()
    }

    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        slots.generation += 1;
        slots.messages = FlashMessages::default();
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.show(FlashMessages {
            success: Some(message.into()),
            error: None,
        })
        .await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.show(FlashMessages {
            success: None,
            error: Some(message.into()),
        })
        .await;
    }

    async fn show(&self, messages: FlashMessages) {
        let generation = {
            let mut slots = self.slots.lock().await;
            slots.generation += 1;
            slots.messages = messages;
            slots.generation
        };

        let slots = Arc::clone(&self.slots);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slots = slots.lock().await;
            if slots.generation == generation {
                slots.messages = FlashMessages::default();
            }
        });
    }
}
