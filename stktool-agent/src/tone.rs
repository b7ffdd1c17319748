//! SIM Toolkit tones
//!
//! Maps the tone names ofono passes to `PlayTone`/`LoopTone` onto a frequency
//! and cadence, and plays them through a GStreamer `audiotestsrc` pipeline.

use std::time::Duration;

use anyhow::Context;
use gstreamer::prelude::*;
use tokio_util::sync::CancellationToken;

/// Tones defined by the ofono SIM Toolkit agent API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    DialTone,
    Busy,
    Congestion,
    RadioAck,
    RadioUnavailable,
    Error,
    CallWaiting,
    RingingTone,
    GeneralBeep,
    PositiveAcknowledgement,
    NegativeAcknowledgement,
    UserRingingTone,
    UserSmsAlertTone,
    Critical,
}

/// On/off pattern of a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Sound until stopped
    Continuous,
    /// Sound once for the given time, then stay silent
    Once(Duration),
    /// Alternate between sound and silence
    Repeat { on: Duration, off: Duration },
}

impl Tone {
    /// Parse an ofono tone name; unknown names become a general beep
    pub fn from_name(name: &str) -> Self {
        match name {
            "dial-tone" => Tone::DialTone,
            "busy" => Tone::Busy,
            "congestion" => Tone::Congestion,
            "radio-ack" => Tone::RadioAck,
            "radio-unavailable" => Tone::RadioUnavailable,
            "error" => Tone::Error,
            "call-waiting" => Tone::CallWaiting,
            "ringing-tone" => Tone::RingingTone,
            "general-beep" => Tone::GeneralBeep,
            "positive-acknowledgement" => Tone::PositiveAcknowledgement,
            "negative-acknowledgement" => Tone::NegativeAcknowledgement,
            "user-ringing-tone" => Tone::UserRingingTone,
            "user-sms-alert-tone" => Tone::UserSmsAlertTone,
            "critical" => Tone::Critical,
            other => {
                tracing::debug!("Unknown tone {:?}, using general beep", other);
                Tone::GeneralBeep
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tone::DialTone => "dial-tone",
            Tone::Busy => "busy",
            Tone::Congestion => "congestion",
            Tone::RadioAck => "radio-ack",
            Tone::RadioUnavailable => "radio-unavailable",
            Tone::Error => "error",
            Tone::CallWaiting => "call-waiting",
            Tone::RingingTone => "ringing-tone",
            Tone::GeneralBeep => "general-beep",
            Tone::PositiveAcknowledgement => "positive-acknowledgement",
            Tone::NegativeAcknowledgement => "negative-acknowledgement",
            Tone::UserRingingTone => "user-ringing-tone",
            Tone::UserSmsAlertTone => "user-sms-alert-tone",
            Tone::Critical => "critical",
        }
    }

    /// Human readable label for the tone dialog
    pub fn label(&self) -> &'static str {
        match self {
            Tone::DialTone => "Dial tone",
            Tone::Busy => "Busy",
            Tone::Congestion => "Congestion",
            Tone::RadioAck => "Radio acknowledge",
            Tone::RadioUnavailable => "Radio unavailable",
            Tone::Error => "Error",
            Tone::CallWaiting => "Call waiting",
            Tone::RingingTone => "Ringing",
            Tone::GeneralBeep => "Beep",
            Tone::PositiveAcknowledgement => "Positive acknowledgement",
            Tone::NegativeAcknowledgement => "Negative acknowledgement",
            Tone::UserRingingTone => "Ringing",
            Tone::UserSmsAlertTone => "Message alert",
            Tone::Critical => "Critical alert",
        }
    }

    /// Frequency in Hz
    pub fn frequency(&self) -> u32 {
        match self {
            Tone::DialTone
            | Tone::Busy
            | Tone::Congestion
            | Tone::RadioAck
            | Tone::RadioUnavailable
            | Tone::CallWaiting
            | Tone::RingingTone => 425,
            Tone::Error => 950,
            Tone::GeneralBeep | Tone::UserSmsAlertTone => 1000,
            Tone::PositiveAcknowledgement => 1200,
            Tone::NegativeAcknowledgement => 400,
            Tone::UserRingingTone => 440,
            Tone::Critical => 1400,
        }
    }

    pub fn cadence(&self) -> Cadence {
        let ms = Duration::from_millis;
        match self {
            Tone::DialTone => Cadence::Continuous,
            Tone::Busy => Cadence::Repeat { on: ms(500), off: ms(500) },
            Tone::Congestion => Cadence::Repeat { on: ms(250), off: ms(250) },
            Tone::RadioAck => Cadence::Once(ms(200)),
            Tone::RadioUnavailable => Cadence::Repeat { on: ms(200), off: ms(200) },
            Tone::Error => Cadence::Repeat { on: ms(330), off: ms(1000) },
            Tone::CallWaiting => Cadence::Repeat { on: ms(200), off: ms(600) },
            Tone::RingingTone => Cadence::Repeat { on: ms(1000), off: ms(4000) },
            Tone::GeneralBeep => Cadence::Once(ms(200)),
            Tone::PositiveAcknowledgement => Cadence::Once(ms(200)),
            Tone::NegativeAcknowledgement => Cadence::Once(ms(300)),
            Tone::UserRingingTone => Cadence::Repeat { on: ms(1000), off: ms(2000) },
            Tone::UserSmsAlertTone => Cadence::Repeat { on: ms(100), off: ms(100) },
            Tone::Critical => Cadence::Repeat { on: ms(200), off: ms(200) },
        }
    }
}

/// Plays tones through GStreamer
#[derive(Debug, Clone)]
pub struct TonePlayer {
    enabled: bool,
    volume: f64,
}

impl TonePlayer {
    pub fn new(enabled: bool, volume: f64) -> Self {
        Self {
            enabled,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Start playing `tone`; it keeps sounding until the handle is dropped
    ///
    /// Must be called with a tokio runtime entered, the cadence is driven by
    /// a task on it.
    pub fn play(&self, tone: Tone) -> anyhow::Result<ToneHandle> {
        if !self.enabled {
            return Ok(ToneHandle::silent());
        }

        gstreamer::init().context("Failed to initialize GStreamer")?;

        let description = format!(
            "audiotestsrc name=src wave=sine is-live=true freq={} volume={} ! audioconvert ! autoaudiosink",
            tone.frequency(),
            self.volume
        );
        let pipeline = gstreamer::parse::launch(&description)
            .context("Failed to build tone pipeline")?;
        let source = pipeline
            .clone()
            .dynamic_cast::<gstreamer::Bin>()
            .ok()
            .and_then(|bin| bin.by_name("src"))
            .context("Tone pipeline has no source element")?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .context("Failed to start tone pipeline")?;
        tracing::debug!("Playing tone {} at {} Hz", tone.name(), tone.frequency());

        let cancel = CancellationToken::new();
        let volume = self.volume;
        let token = cancel.clone();
        match tone.cadence() {
            Cadence::Continuous => {}
            Cadence::Once(on) => {
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(on) => source.set_property("volume", 0.0f64),
                    }
                });
            }
            Cadence::Repeat { on, off } => {
                tokio::spawn(async move {
                    loop {
                        source.set_property("volume", volume);
                        tokio::select! {
                            _ = token.cancelled() => break,
                            _ = tokio::time::sleep(on) => {}
                        }
                        source.set_property("volume", 0.0f64);
                        tokio::select! {
                            _ = token.cancelled() => break,
                            _ = tokio::time::sleep(off) => {}
                        }
                    }
                });
            }
        }

        Ok(ToneHandle {
            pipeline: Some(pipeline),
            cancel,
        })
    }
}

impl Default for TonePlayer {
    fn default() -> Self {
        Self::new(true, 0.3)
    }
}

/// A sounding tone; stops when dropped
#[derive(Debug)]
pub struct ToneHandle {
    pipeline: Option<gstreamer::Element>,
    cancel: CancellationToken,
}

impl ToneHandle {
    fn silent() -> Self {
        Self {
            pipeline: None,
            cancel: CancellationToken::new(),
        }
    }

    #[cfg(test)]
    fn is_silent(&self) -> bool {
        self.pipeline.is_none()
    }
}

impl Drop for ToneHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(pipeline) = self.pipeline.take() {
            if let Err(e) = pipeline.set_state(gstreamer::State::Null) {
                tracing::warn!("Failed to stop tone pipeline: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_names_roundtrip() {
        for name in [
            "dial-tone",
            "busy",
            "congestion",
            "radio-ack",
            "radio-unavailable",
            "error",
            "call-waiting",
            "ringing-tone",
            "general-beep",
            "positive-acknowledgement",
            "negative-acknowledgement",
            "user-ringing-tone",
            "user-sms-alert-tone",
            "critical",
        ] {
            assert_eq!(Tone::from_name(name).name(), name);
        }
    }

    #[test]
    fn test_unknown_tone_is_beep() {
        assert_eq!(Tone::from_name("kazoo"), Tone::GeneralBeep);
    }

    #[test]
    fn test_tone_cadence() {
        assert_eq!(Tone::DialTone.cadence(), Cadence::Continuous);
        assert!(matches!(Tone::Busy.cadence(), Cadence::Repeat { .. }));
        assert_eq!(
            Tone::RadioAck.cadence(),
            Cadence::Once(Duration::from_millis(200))
        );
    }

    #[test]
    fn test_disabled_player_is_silent() {
        let player = TonePlayer::new(false, 0.5);
        let handle = player.play(Tone::Busy).unwrap();
        assert!(handle.is_silent());
    }
}
