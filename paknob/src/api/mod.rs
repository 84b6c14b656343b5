pub mod command;
pub mod structs;
pub mod volume;

pub use command::*;
pub use structs::*;
pub use volume::*;

/// Which class of default device a command targets.
///
/// Sinks and sources offer the same knobs through different introspection
/// entry points; everything else about a command is identical, so operations
/// are parameterized by this descriptor instead of being duplicated per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Sink,
    Source,
}

impl DeviceKind {
    /// The server-side sentinel name that resolves to the current default
    /// device of this class.
    pub fn default_name(self) -> &'static str {
        match self {
            DeviceKind::Sink => "@DEFAULT_SINK@",
            DeviceKind::Source => "@DEFAULT_SOURCE@",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceKind;

    #[test]
    fn default_names_resolve_server_side() {
        assert_eq!(DeviceKind::Sink.default_name(), "@DEFAULT_SINK@");
        assert_eq!(DeviceKind::Source.default_name(), "@DEFAULT_SOURCE@");
    }
}
