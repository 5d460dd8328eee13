use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use fltk::valuator::{Slider, SliderType};
use fltk::{app, enums, enums::*, frame::Frame, prelude::*, window::Window};
use lockfree::prelude::spsc;

use keymidi::midir_driver::MidirDriver;
use keymidi::settings::{Backend, Settings};
use keymidi::synth_driver::SynthDriver;
use keymidi::{
    Controller, DeviceChannel, Instrument, KeyEvent, KeyToNoteMap, MidiDriver, Transition,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let settings = Settings::from_env().context("reading settings")?;

    let driver: Box<dyn MidiDriver> = match settings.backend {
        Backend::Synth => Box::new(SynthDriver::new()),
        Backend::Midi => Box::new(MidirDriver::new("keymidi").context("initialising MIDI output")?),
    };
    let keymap = KeyToNoteMap::qwerty().with_velocity(settings.velocity);
    let mut controller = Controller::new(DeviceChannel::new(driver), keymap);
    if controller.open(settings.device) {
        controller.set_instrument(settings.instrument);
    } else {
        log::warn!("no output device, key presses will be silent");
    }

    run(controller, settings.instrument)
}

fn run<D: MidiDriver>(
    mut controller: Controller<D>,
    instrument: Instrument,
) -> anyhow::Result<()> {
    let (key_tx, mut key_rx) = spsc::create::<KeyEvent<char>>();
    let (instrument_tx, mut instrument_rx) = spsc::create::<u8>();

    let app = app::App::default();
    let mut wind = Window::default().with_size(400, 260).with_label("keymidi");
    let mut key_label = Frame::new(20, 20, 160, 60, "");
    key_label.set_label_size(36);
    let mut note_label = Frame::new(200, 20, 160, 60, "");
    note_label.set_label_size(36);

    let mut instrument_slider = Slider::new(20, 160, 360, 20, "Instrument");
    instrument_slider.set_type(SliderType::Horizontal);
    instrument_slider.set_align(Align::Bottom);
    instrument_slider.set_bounds(0., 127.);
    instrument_slider.set_step(1., 1);
    instrument_slider.set_value(instrument.id() as f64);
    let instrument_tx = Rc::new(RefCell::new(instrument_tx));
    instrument_slider.set_callback(move |s| {
        if instrument_tx.borrow_mut().send(s.value() as u8).is_err() {
            log::warn!("instrument change dropped");
        }
    });
    wind.end();
    wind.show();

    let key_tx = Rc::new(RefCell::new(key_tx));
    wind.handle(move |_, ev| {
        let transition = match ev {
            enums::Event::KeyDown => Transition::Pressed,
            enums::Event::KeyUp => Transition::Released,
            _ => return false,
        };
        let event = app::event_key().to_char().map(|c| KeyEvent {
            key: c.to_ascii_lowercase(),
            transition,
        });
        if let Some(event) = event {
            if key_tx.borrow_mut().send(event).is_err() {
                log::warn!("key event dropped");
            }
        }
        true
    });

    while app.wait() {
        controller.drain(&mut key_rx, |key, note| {
            key_label.set_label(&key.to_string());
            note_label.set_label(&note.to_string());
            key_label.redraw();
            note_label.redraw();
        });
        while let Ok(id) = instrument_rx.recv() {
            if let Some(instrument) = Instrument::new(id) {
                controller.set_instrument(instrument);
            }
        }
    }

    controller.close();
    Ok(())
}
