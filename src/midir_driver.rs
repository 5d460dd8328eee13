use midir::{MidiOutput, MidiOutputConnection};

use crate::device::MidiDriver;
use crate::error::{DeviceError, Result};
use crate::midi::ShortMessage;

const PORT_NAME: &str = "keymidi-out";

/// Sends to a system MIDI output port.
pub struct MidirDriver {
    output: Option<MidiOutput>,
    connection: Option<MidiOutputConnection>,
    port_names: Vec<String>,
}

impl MidirDriver {
    pub fn new(client_name: &str) -> Result<Self> {
        let output = MidiOutput::new(client_name)?;
        let mut driver = MidirDriver {
            output: Some(output),
            connection: None,
            port_names: Vec::new(),
        };
        driver.refresh_ports();
        Ok(driver)
    }

    fn refresh_ports(&mut self) {
        if let Some(output) = &self.output {
            self.port_names = output
                .ports()
                .iter()
                .map(|p| output.port_name(p).unwrap_or_else(|_| "unknown".into()))
                .collect();
        }
    }
}

impl MidiDriver for MidirDriver {
    fn device_count(&self) -> usize {
        self.port_names.len()
    }

    fn device_name(&self, index: usize) -> Option<String> {
        self.port_names.get(index).cloned()
    }

    fn open(&mut self, index: usize) -> Result<()> {
        let output = self
            .output
            .take()
            .ok_or_else(|| DeviceError::Device("output already connected".into()))?;
        let ports = output.ports();
        let Some(port) = ports.get(index) else {
            self.output = Some(output);
            return Err(DeviceError::BadDeviceId {
                index,
                count: ports.len(),
            });
        };

        match output.connect(port, PORT_NAME) {
            Ok(connection) => {
                self.connection = Some(connection);
                Ok(())
            }
            Err(e) => {
                let err = DeviceError::from(&e);
                self.output = Some(e.into_inner());
                Err(err)
            }
        }
    }

    fn send_short_message(&mut self, message: ShortMessage) -> Result<()> {
        let connection = self.connection.as_mut().ok_or(DeviceError::NotOpen)?;
        connection
            .send(&message.to_bytes())
            .map_err(|e| DeviceError::Rejected {
                message: message.raw(),
                reason: e.to_string(),
            })
    }

    fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            self.output = Some(connection.close());
            self.refresh_ports();
        }
        Ok(())
    }
}
