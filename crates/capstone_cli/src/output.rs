//! Terminal output helpers.

use anyhow::Result;
use serde::Serialize;

use capstone_app::{Notice, NoticeLevel};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_notice(notice: &Notice) {
    let icon = match notice.level {
        NoticeLevel::Success => "✅",
        NoticeLevel::Info => "ℹ️ ",
        NoticeLevel::Warning => "⚠️ ",
        NoticeLevel::Error => "❌",
    };
    println!("{} {}", icon, notice.message);
}

pub fn success(message: impl Into<String>) {
    print_notice(&Notice::success(message));
}

pub fn warning(message: impl Into<String>) {
    print_notice(&Notice::warning(message));
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
