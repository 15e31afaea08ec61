pub fn get_form_relay_url() -> &'static str {
    "https://api.web3forms.com/submit"
}

/// Public Web3Forms key for the contact form. Override at build time with
/// `FORM_RELAY_ACCESS_KEY=... trunk build`.
pub fn get_access_key() -> &'static str {
    match option_env!("FORM_RELAY_ACCESS_KEY") {
        Some(key) if !key.is_empty() => key,
        _ => "cd3a30fc-fc19-4a67-8152-3c602c3e4d46",
    }
}

// Scroll
pub const NAV_SCROLLED_THRESHOLD: f64 = 50.0;
pub const ACTIVE_SECTION_LOOKAHEAD: f64 = 100.0;

// Counters
pub const COUNTER_DURATION_MS: f64 = 2000.0;
pub const COUNTER_FRAME_MS: f64 = 16.0;

// Contact form
pub const STATUS_AUTO_HIDE_MS: u32 = 6_000;
