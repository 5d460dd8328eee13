use std::collections::HashMap;
use std::hash::Hash;

use lockfree::channel::RecvErr;
use lockfree::prelude::spsc;

use crate::device::{DeviceChannel, MidiDriver};
use crate::instrument::Instrument;
use crate::key_state::KeyState;
use crate::keymap::KeyToNoteMap;
use crate::note::SimpleNote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pressed,
    Released,
}

/// One physical key transition as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent<K> {
    pub key: K,
    pub transition: Transition,
}

impl<K> KeyEvent<K> {
    pub fn pressed(key: K) -> Self {
        KeyEvent {
            key,
            transition: Transition::Pressed,
        }
    }

    pub fn released(key: K) -> Self {
        KeyEvent {
            key,
            transition: Transition::Released,
        }
    }
}

/// Turns key transitions into note-on/note-off pairs on a device.
///
/// Each key is either up or down. Messages go out only when a key changes
/// state, so OS key repeat and stray releases never reach the device. Keys
/// mapped to a rest change state silently.
///
/// A note-off is only ever sent for a note-on the device accepted, so a key
/// pressed while the device was closed stays silent on release.
pub struct Controller<D: MidiDriver, K: Eq + Hash + Copy = char> {
    device: DeviceChannel<D>,
    keymap: KeyToNoteMap<K>,
    keys: KeyState<K>,
    sounding: HashMap<K, SimpleNote>,
}

impl<D: MidiDriver, K: Eq + Hash + Copy> Controller<D, K> {
    pub fn new(device: DeviceChannel<D>, keymap: KeyToNoteMap<K>) -> Self {
        Controller {
            device,
            keymap,
            keys: KeyState::new(),
            sounding: HashMap::new(),
        }
    }

    pub fn device(&self) -> &DeviceChannel<D> {
        &self.device
    }

    pub fn keys(&self) -> &KeyState<K> {
        &self.keys
    }

    /// Returns the note the key resolved to if it went down.
    pub fn key_down(&mut self, key: K) -> Option<SimpleNote> {
        if self.keys.is_down(key) {
            return None;
        }
        let note = self.keymap.resolve(key);
        if self.device.play_note(&note) {
            self.sounding.insert(key, note);
        }
        self.keys.mark_down(key);
        Some(note)
    }

    /// Returns the released note if the key was down.
    pub fn key_up(&mut self, key: K) -> Option<SimpleNote> {
        if !self.keys.mark_up(key) {
            return None;
        }
        match self.sounding.remove(&key) {
            Some(note) => {
                self.device.stop_note(&note);
                Some(note)
            }
            None => Some(self.keymap.resolve(key)),
        }
    }

    pub fn handle(&mut self, event: KeyEvent<K>) -> Option<SimpleNote> {
        match event.transition {
            Transition::Pressed => self.key_down(event.key),
            Transition::Released => self.key_up(event.key),
        }
    }

    /// Handles every queued event, calling `on_press` for each key that
    /// went down. Returns `false` once the producer has hung up.
    pub fn drain<F>(&mut self, rx: &mut spsc::Receiver<KeyEvent<K>>, mut on_press: F) -> bool
    where
        F: FnMut(K, &SimpleNote),
    {
        loop {
            match rx.recv() {
                Ok(event) => {
                    let pressed = event.transition == Transition::Pressed;
                    if let Some(note) = self.handle(event) {
                        if pressed {
                            on_press(event.key, &note);
                        }
                    }
                }
                Err(RecvErr::NoMessage) => return true,
                Err(RecvErr::NoSender) => return false,
            }
        }
    }

    /// Sends note-off for every sounding key and forgets all held keys.
    pub fn release_all(&mut self) {
        for key in self.keys.clear() {
            if let Some(note) = self.sounding.remove(&key) {
                self.device.stop_note(&note);
            }
        }
    }

    /// Opens output device `index`. Keys already held stay silent until
    /// pressed again.
    pub fn open(&mut self, index: usize) -> bool {
        self.device.open(index)
    }

    pub fn set_instrument(&mut self, instrument: Instrument) {
        self.device.set_instrument(instrument);
    }

    /// Releases held notes, then closes the device.
    pub fn close(&mut self) {
        if !self.keys.is_empty() {
            log::debug!("releasing {} held key(s)", self.keys.len());
        }
        self.release_all();
        self.device.close();
    }
}

impl<D: MidiDriver, K: Eq + Hash + Copy> Drop for Controller<D, K> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDriver;
    use proptest::prelude::*;

    const NOTE_ON: u8 = 0x90;
    const NOTE_OFF: u8 = 0x80;

    fn controller() -> Controller<RecordingDriver> {
        let mut device = DeviceChannel::new(RecordingDriver::with_devices(1));
        assert!(device.open(0));
        Controller::new(device, KeyToNoteMap::qwerty())
    }

    #[test]
    fn key_repeat_sends_one_note_on() {
        let mut c = controller();
        assert!(c.key_down('z').is_some());
        assert!(c.key_down('z').is_none());
        assert!(c.key_down('z').is_none());
        assert_eq!(c.device().driver().note_statuses(), vec![(NOTE_ON, 48)]);
    }

    #[test]
    fn press_and_release_pair_up() {
        let mut c = controller();
        c.key_down('q');
        c.key_down('w');
        c.key_up('q');
        c.key_up('w');
        assert_eq!(
            c.device().driver().note_statuses(),
            vec![(NOTE_ON, 60), (NOTE_ON, 62), (NOTE_OFF, 60), (NOTE_OFF, 62)]
        );
        assert!(c.keys().is_empty());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut c = controller();
        let before = c.device().driver().attempts();
        assert!(c.key_up('z').is_none());
        assert_eq!(c.device().driver().attempts(), before);
    }

    #[test]
    fn rest_keys_change_state_silently() {
        let mut c = controller();
        let before = c.device().driver().attempts();
        let note = c.key_down('a').expect("transition");
        assert!(note.is_rest());
        assert!(c.keys().is_down('a'));
        assert!(c.key_up('a').is_some());
        assert_eq!(c.device().driver().attempts(), before);
    }

    #[test]
    fn close_releases_held_notes() {
        let mut c = controller();
        c.key_down('z');
        c.key_down('a');
        c.close();
        assert_eq!(
            c.device().driver().note_statuses(),
            vec![(NOTE_ON, 48), (NOTE_OFF, 48)]
        );
        assert!(c.keys().is_empty());
        assert!(!c.device().is_open());
        assert_eq!(c.device().driver().closes(), 1);
    }

    #[test]
    fn key_held_across_open_releases_silently() {
        let device = DeviceChannel::new(RecordingDriver::with_devices(1));
        let mut c = Controller::new(device, KeyToNoteMap::qwerty());
        assert!(c.key_down('z').is_some());
        assert!(c.open(0));
        assert!(c.key_up('z').is_some());
        assert!(c.device().driver().note_statuses().is_empty());
        assert!(c.keys().is_empty());

        c.key_down('z');
        c.key_up('z');
        assert_eq!(
            c.device().driver().note_statuses(),
            vec![(NOTE_ON, 48), (NOTE_OFF, 48)]
        );
    }

    #[test]
    fn rejected_note_on_gets_no_note_off() {
        let mut device = DeviceChannel::new(RecordingDriver::with_devices(1).failing_sends());
        assert!(device.open(0));
        let mut c = Controller::new(device, KeyToNoteMap::qwerty());
        c.key_down('z');
        let after_press = c.device().driver().attempts();
        c.key_up('z');
        assert_eq!(c.device().driver().attempts(), after_press);
    }

    #[test]
    fn reopen_after_close_starts_with_no_held_keys() {
        let mut c = controller();
        c.key_down('z');
        c.key_down('x');
        c.close();
        assert!(c.keys().is_empty());

        assert!(c.open(0));
        assert!(c.key_up('z').is_none());
        assert!(c.key_down('z').is_some());
        assert_eq!(
            c.device().driver().note_statuses(),
            vec![
                (NOTE_ON, 48),
                (NOTE_ON, 50),
                (NOTE_OFF, 48),
                (NOTE_OFF, 50),
                (NOTE_ON, 48)
            ]
        );
    }

    #[test]
    fn set_instrument_goes_to_device() {
        let mut c = controller();
        c.set_instrument(Instrument::new(31).expect("valid program"));
        assert_eq!(c.device().selected_instrument().id(), 30);
        assert_eq!(c.device().driver().sent().last(), Some(&0x1ec0));
    }

    #[test]
    fn drain_consumes_queued_events() {
        let mut c = controller();
        let (mut tx, mut rx) = spsc::create::<KeyEvent<char>>();
        for event in [
            KeyEvent::pressed('z'),
            KeyEvent::pressed('z'),
            KeyEvent::pressed('x'),
            KeyEvent::released('z'),
        ] {
            assert!(tx.send(event).is_ok());
        }

        let mut shown = Vec::new();
        assert!(c.drain(&mut rx, |key, note| shown.push((key, note.to_string()))));
        assert_eq!(shown, vec![('z', "C 3".to_string()), ('x', "D 3".to_string())]);
        assert_eq!(
            c.device().driver().note_statuses(),
            vec![(NOTE_ON, 48), (NOTE_ON, 50), (NOTE_OFF, 48)]
        );

        drop(tx);
        assert!(!c.drain(&mut rx, |_, _| {}));
    }

    fn key_event() -> impl Strategy<Value = KeyEvent<char>> {
        (prop::sample::select(vec!['z', 'x', 'q', 'a']), any::<bool>()).prop_map(|(key, down)| {
            if down {
                KeyEvent::pressed(key)
            } else {
                KeyEvent::released(key)
            }
        })
    }

    proptest! {
        #[test]
        fn note_messages_alternate_per_key(events in prop::collection::vec(key_event(), 0..80)) {
            let mut c = controller();
            for event in &events {
                c.handle(*event);
            }

            let statuses = c.device().driver().note_statuses();
            for note in [48u8, 50, 60] {
                let per_note: Vec<u8> = statuses
                    .iter()
                    .filter(|(_, n)| *n == note)
                    .map(|(s, _)| *s)
                    .collect();
                for (i, status) in per_note.iter().enumerate() {
                    let expected = if i % 2 == 0 { NOTE_ON } else { NOTE_OFF };
                    prop_assert_eq!(*status, expected);
                }
            }

            let ons = statuses.iter().filter(|(s, _)| *s == NOTE_ON).count();
            let offs = statuses.len() - ons;
            let held = ['z', 'x', 'q'].iter().filter(|k| c.keys().is_down(**k)).count();
            prop_assert_eq!(ons - offs, held);
        }
    }
}
