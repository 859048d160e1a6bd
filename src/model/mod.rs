//! Types that represent the core data model, such as `Entry` and `RecurringTemplate`.
mod amount;
mod category;
mod entry;
mod template;

pub use amount::Amount;
pub use category::{
    all_categories, categories_for, is_valid_for, EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
pub(crate) use entry::is_entry_header;
pub use entry::{Entry, EntryColumn, EntryKind, ENTRY_HEADERS};
pub(crate) use template::is_template_header;
pub use template::{RecurringTemplate, TemplateColumn, TEMPLATE_HEADERS};
