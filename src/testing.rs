use crate::device::MidiDriver;
use crate::error::{DeviceError, Result};
use crate::midi::ShortMessage;

/// Driver double that records every message it accepts.
#[derive(Debug, Default)]
pub(crate) struct RecordingDriver {
    devices: usize,
    open: Option<usize>,
    refuse_open: bool,
    fail_sends: bool,
    sent: Vec<u32>,
    attempts: usize,
    opens: usize,
    closes: usize,
}

impl RecordingDriver {
    pub(crate) fn with_devices(devices: usize) -> Self {
        RecordingDriver {
            devices,
            ..Default::default()
        }
    }

    pub(crate) fn refusing_open(self) -> Self {
        RecordingDriver {
            refuse_open: true,
            ..self
        }
    }

    pub(crate) fn failing_sends(self) -> Self {
        RecordingDriver {
            fail_sends: true,
            ..self
        }
    }

    pub(crate) fn sent(&self) -> &[u32] {
        &self.sent
    }

    /// Status bytes of the note messages sent so far.
    pub(crate) fn note_statuses(&self) -> Vec<(u8, u8)> {
        self.sent
            .iter()
            .map(|&raw| ShortMessage::from_raw(raw))
            .filter(|m| matches!(m.status(), 0x80 | 0x90))
            .map(|m| (m.status(), m.data1()))
            .collect()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes
    }
}

impl MidiDriver for RecordingDriver {
    fn device_count(&self) -> usize {
        self.devices
    }

    fn open(&mut self, index: usize) -> Result<()> {
        if self.refuse_open {
            return Err(DeviceError::Device("allocated".into()));
        }
        self.opens += 1;
        self.open = Some(index);
        Ok(())
    }

    fn send_short_message(&mut self, message: ShortMessage) -> Result<()> {
        self.attempts += 1;
        if self.open.is_none() {
            return Err(DeviceError::NotOpen);
        }
        if self.fail_sends {
            return Err(DeviceError::Rejected {
                message: message.raw(),
                reason: "invalid handle".into(),
            });
        }
        self.sent.push(message.raw());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closes += 1;
        self.open = None;
        Ok(())
    }
}
