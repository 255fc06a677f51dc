//! Reply text for the built-in commands: menu header, ping, runtime,
//! botstatus, owner, repo.

use prosperez_core::{config::BotConfig, heap::HeapUsage};
use std::time::Duration;

/// Width of the RAM gauge in the menu header.
const RAM_BAR_CELLS: usize = 10;

pub(super) const PING_ACK: &str = "🏓 Pinging...";

/// Live info block placed above the catalog.
pub(super) fn menu_header(config: &BotConfig, build_time: Duration, heap: HeapUsage) -> String {
    format!(
        "┏▣ ◈ *{name}* ◈\n\
         ┃ *ᴏᴡɴᴇʀ* : {owner}\n\
         ┃ *ᴘʀᴇғɪx* : [ {prefix} ]\n\
         ┃ *ʜᴏsᴛ* : {host}\n\
         ┃ *ᴘʟᴜɢɪɴs* : {plugins}\n\
         ┃ *ᴍᴏᴅᴇ* : {mode}\n\
         ┃ *ᴠᴇʀsɪᴏɴ* : {version}\n\
         ┃ *sᴘᴇᴇᴅ* : {speed} ms\n\
         ┃ *ᴜsᴀɢᴇ* : {used:.2} MB of {total:.2} MB\n\
         ┃ *ʀᴀᴍ:* [{bar}] {percent}%\n\
         ┗▣",
        name = config.name.to_uppercase(),
        owner = config.owner,
        prefix = config.prefix,
        host = config.host,
        plugins = config.plugins,
        mode = config.mode,
        version = config.version,
        speed = millis(build_time),
        used = heap.used_mb(),
        total = heap.total_mb(),
        bar = heap.bar(RAM_BAR_CELLS),
        percent = heap.percent(),
    )
}

pub(super) fn response_time(elapsed: Duration) -> String {
    format!("⚡ Response Time: {} ms", millis(elapsed))
}

pub(super) fn runtime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("⏰ *Runtime*\n{hours}h {minutes}m {seconds}s")
}

pub(super) fn bot_status(config: &BotConfig, uptime: Duration, heap: HeapUsage) -> String {
    format!(
        "┏▣ ◈ *BOT STATUS* ◈\n\
         ┃ *Status* : Online ✅\n\
         ┃ *Version* : {version}\n\
         ┃ *Platform* : {host}\n\
         ┃ *Uptime* : {minutes} minutes\n\
         ┃ *Memory* : {used:.2} MB\n\
         ┗▣",
        version = config.version,
        host = config.host,
        minutes = uptime.as_secs() / 60,
        used = heap.used_mb(),
    )
}

pub(super) fn owner(config: &BotConfig) -> String {
    format!(
        "👤 *Owner*: {}\n\n_Contact the owner for support_",
        config.owner
    )
}

pub(super) fn repo(config: &BotConfig) -> String {
    format!(
        "🔗 *{} Bot Repository*\n\nVersion: {}\nDeveloped for WhatsApp automation",
        config.name, config.version
    )
}

/// Milliseconds with four decimals.
fn millis(elapsed: Duration) -> String {
    format!("{:.4}", elapsed.as_secs_f64() * 1000.0)
}
