pub const HOST_PAGE_FILENAME: &str = "preview.html";
pub const QUIT_COMMAND: &str = ":quit";
/// Seconds between host page reloads while a clone is loading.
pub const LOADING_REFRESH_SECS: u32 = 2;
pub const PAGE_TITLE: &str = "Website Cloner";
