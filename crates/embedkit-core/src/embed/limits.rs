//! Platform limits applied when validating an embed.

/// Maximum characters in an embed title.
pub const MAX_TITLE_CHARS: usize = 256;
/// Maximum characters in an embed description.
pub const MAX_DESCRIPTION_CHARS: usize = 4096;
/// Maximum number of fields.
pub const MAX_FIELDS: usize = 25;
/// Maximum characters in a field name.
pub const MAX_FIELD_NAME_CHARS: usize = 256;
/// Maximum characters in a field value.
pub const MAX_FIELD_VALUE_CHARS: usize = 1024;
/// Maximum characters in the footer text.
pub const MAX_FOOTER_TEXT_CHARS: usize = 2048;
/// Maximum characters in the author name.
pub const MAX_AUTHOR_NAME_CHARS: usize = 256;
/// Ceiling on the combined text of an embed.
pub const MAX_TOTAL_CHARS: usize = 6000;
/// Largest value a 24-bit RGB color may take.
pub const MAX_COLOR: u32 = 0xFF_FF_FF;

/// URL schemes accepted for icons, images and links.
pub const ACCEPTED_URL_SCHEMES: &[&str] = &["http://", "https://", "attachment://"];

/// Maximum characters in one plain-text page (message content limit).
pub const TEXT_PAGE_LIMIT: usize = 2000;
