use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date format used by the CSV export, e.g. `24.09.2016`.
pub(crate) const DATE_FORMAT: &str = "%d.%m.%Y";

/// The expected header row of the CSV export, in column order.
pub(crate) const HEADERS: [&str; 9] = [
    DATE_STR,
    RECIPIENT_STR,
    CURRENCY_STR,
    AMOUNT_STR,
    MAIN_CATEGORY_STR,
    ACCOUNT_NAME_STR,
    ACCOUNT_NO_STR,
    BOOKING_TEXT_STR,
    SUBCATEGORY_STR,
];

pub(crate) const DATE_STR: &str = "Date";
pub(crate) const RECIPIENT_STR: &str = "Recipient / Order issuer";
pub(crate) const CURRENCY_STR: &str = "Currency";
pub(crate) const AMOUNT_STR: &str = "Amount";
pub(crate) const MAIN_CATEGORY_STR: &str = "Main category";
pub(crate) const ACCOUNT_NAME_STR: &str = "Account name";
pub(crate) const ACCOUNT_NO_STR: &str = "Account no.";
pub(crate) const BOOKING_TEXT_STR: &str = "Booking text";
pub(crate) const SUBCATEGORY_STR: &str = "Subcategory";

/// One booked transaction from the CSV export.
///
/// Transactions are created once at load time and never mutated afterwards;
/// the ledger owns them for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    date: NaiveDate,
    recipient: String,
    currency: String,
    amount: Amount,
    main_category: String,
    account_name: String,
    account_no: String,
    booking_text: String,
    subcategory: String,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        recipient: impl Into<String>,
        currency: impl Into<String>,
        amount: Amount,
        main_category: impl Into<String>,
        account_name: impl Into<String>,
        account_no: impl Into<String>,
        booking_text: impl Into<String>,
        subcategory: impl Into<String>,
    ) -> Self {
        Self {
            date,
            recipient: recipient.into(),
            currency: currency.into(),
            amount,
            main_category: main_category.into(),
            account_name: account_name.into(),
            account_no: account_no.into(),
            booking_text: booking_text.into(),
            subcategory: subcategory.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The raw main-category name from the CSV. This is not validated against
    /// the fixed enumeration at load time; filtering matches it by name.
    pub fn main_category(&self) -> &str {
        &self.main_category
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn account_no(&self) -> &str {
        &self.account_no
    }

    pub fn booking_text(&self) -> &str {
        &self.booking_text
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    /// The date formatted the way it appeared in the CSV, e.g. `01.01.2016`.
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
