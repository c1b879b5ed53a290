//! User-facing notices for rejected cart operations.

use std::sync::Mutex;

use crate::error::{CartError, Operation};
use crate::locale::Locale;

/// A message the shopper should see after a cart operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// The requested quantity is more than the store has.
    OutOfStock,
    /// Adding a product failed for any other reason.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a quantity failed for any reason other than stock.
    UpdateFailed,
}

impl Notice {
    /// The notice shown for an error raised by `operation`.
    pub fn for_error(operation: Operation, error: &CartError) -> Self {
        if error.is_stock_exceeded() {
            return Notice::OutOfStock;
        }
        match operation {
            Operation::Add => Notice::AddFailed,
            Operation::Remove => Notice::RemoveFailed,
            Operation::Update => Notice::UpdateFailed,
        }
    }

    /// Message text in the given locale.
    pub fn message(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, Notice::OutOfStock) => "Quantidade solicitada fora de estoque",
            (Locale::PtBr, Notice::AddFailed) => "Erro na adição do produto",
            (Locale::PtBr, Notice::RemoveFailed) => "Erro na remoção do produto",
            (Locale::PtBr, Notice::UpdateFailed) => "Erro na alteração de quantidade do produto",
            (Locale::En, Notice::OutOfStock) => "Requested quantity is out of stock",
            (Locale::En, Notice::AddFailed) => "Could not add the product",
            (Locale::En, Notice::RemoveFailed) => "Could not remove the product",
            (Locale::En, Notice::UpdateFailed) => "Could not change the product quantity",
        }
    }
}

/// Receives notices from the cart store.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> Notifier for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice)
    }
}

/// Notifier that writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    locale: Locale,
}

impl LogNotifier {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(?notice, "{}", notice.message(self.locale));
    }
}

/// Notifier that keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
