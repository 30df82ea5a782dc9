pub struct Icons;

impl Icons {
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const FILE: &str = "📄";
    pub const PACKAGE: &str = "📦";
    pub const WRENCH: &str = "🔧";
    pub const CLOCK: &str = "⏱️";
    pub const PIN: &str = "📍";
}
