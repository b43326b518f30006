#![forbid(unsafe_code)]

/// Third-party appointment system embedded by the booking tab.
pub const BOOKING_URL: &str = "https://e2pk.moe.gov.my/inframe.cfm?temujanji";

/// User-facing message shown after a rejected admin password.
pub const LOGIN_DENIED_MESSAGE: &str = "Kata laluan salah. Sila cuba lagi.";
