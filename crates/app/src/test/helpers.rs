//! Test Helpers

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use till::products::{ProductId, ProductSnapshot};
use wiremock::MockServer;

use crate::{
    api::{ApiClient, ApiConfig, ApiError},
    notifications::{Notification, NotificationLevel, Notifier},
};

pub(crate) fn api_for(server: &MockServer) -> Result<ApiClient, ApiError> {
    ApiClient::new(ApiConfig {
        base_url: format!("{}/api", server.uri()),
        timeout: Duration::from_secs(5),
    })
}

/// An active product with barcode `750` followed by the zero-padded id.
pub(crate) fn product(
    id: u64,
    retail: i64,
    wholesale: Option<i64>,
    stock: i64,
) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        name: format!("Producto {id}"),
        barcode: Some(barcode(id)),
        retail_price: retail,
        wholesale_price: wholesale,
        current_stock: stock,
        is_active: true,
    }
}

pub(crate) fn barcode(id: u64) -> String {
    format!("750{id:010}")
}

/// Keeps every notification for later inspection.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn all(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn last(&self) -> Option<Notification> {
        self.all().pop()
    }

    pub(crate) fn last_level(&self) -> Option<NotificationLevel> {
        self.last().map(|notification| notification.level)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
