//! Values carried by leaf tokens: the thing being edited, paged, sorted or saved.

/// Clipboard value kinds for copy, cut and paste.
pub mod clipboard;
/// Cell find queries.
pub mod find;
/// Metadata property names.
pub mod metadata;
/// Viewport navigation lists.
pub mod navigation;
/// Offset and count pagination.
pub mod paging;
/// Formatter and parser pattern kinds.
pub mod pattern;
/// Form and plugin names.
pub mod plugin;
/// Multi-cell save payloads.
pub mod save;
/// Sort comparator lists.
pub mod sort;
/// Text style property names.
pub mod style;
/// Value types, locales and currencies.
pub mod value;

pub use clipboard::ClipboardValueKind;
pub use find::{CellFindQuery, CellRangeReferencePath};
pub use metadata::MetadataPropertyName;
pub use navigation::{NavigationDirection, ViewportNavigation, ViewportNavigationList};
pub use paging::OffsetAndCount;
pub use pattern::PatternKind;
pub use plugin::{FormName, PluginName, PluginUpload};
pub use save::{CellSaveValues, SaveEntity};
pub use sort::{ColumnOrRow, SortComparator, SortComparators, SortDirection};
pub use style::TextStylePropertyName;
pub use value::{Currency, Locale, ValueTypeName};
