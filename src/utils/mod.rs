// Utils compartidos

pub mod constants;
pub mod i18n;
pub mod qr_ffi;
pub mod storage;
