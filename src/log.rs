//! Bridge from libgphoto2's logging into `tracing`

/// Verbosity of the messages libgphoto2 reports
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
  /// Errors only
  #[default]
  Error,
  /// Verbose messages
  Verbose,
  /// Debug messages
  Debug,
  /// Raw data dumps, very noisy
  Data,
}

/// Emit one libgphoto2 log message as a `tracing` event
#[cfg_attr(not(feature = "libgphoto2"), allow(dead_code))]
pub(crate) fn forward(level: LogLevel, domain: &str, message: &str) {
  let message = message.trim_end();

  match level {
    LogLevel::Error => tracing::error!(target: "gphoto2", domain, "{message}"),
    LogLevel::Verbose => tracing::info!(target: "gphoto2", domain, "{message}"),
    LogLevel::Debug => tracing::debug!(target: "gphoto2", domain, "{message}"),
    LogLevel::Data => tracing::trace!(target: "gphoto2", domain, "{message}"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn levels_are_ordered_by_verbosity() {
    assert!(LogLevel::Error < LogLevel::Verbose);
    assert!(LogLevel::Debug < LogLevel::Data);
    assert_eq!(LogLevel::default(), LogLevel::Error);
  }

  #[test]
  fn forwarding_does_not_need_a_subscriber() {
    crate::init_tracing();
    forward(LogLevel::Debug, "ptp2/usb", "sending 12 bytes\n");
    forward(LogLevel::Error, "gphoto2-camera", "");
  }
}
