//! Card exports: vCard files and QR payloads

pub mod qr;
pub mod vcard;

pub use qr::{QrPayload, share_url};
pub use vcard::{to_vcard, vcard_filename};
