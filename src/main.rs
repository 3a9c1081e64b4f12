//! knobmenu firmware for the nRF52840.
//!
//! Hardware:
//!   - SSD1306 128×64 OLED (menu lists) on TWISPI0
//!   - SSD1306 128×32 OLED (digit editor panel) on TWISPI1
//!   - Rotary encoder with push button on GPIO
//!   - Piezo buzzer on PWM0
//!
//! Tasks:
//!   - `encoder_task`: samples the encoder pins and feeds `ROTARY`
//!   - main: runs one engine cycle per tick and syncs values to flash

#![no_std]
#![no_main]

use defmt::{error, info, warn};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Instant, Timer};
use knobmenu::config::STORE_IMAGE_SIZE;
use knobmenu::hal::RotaryAccumulator;
use knobmenu::menu::catalog::default_tree;
use knobmenu::menu::MenuTree;
use knobmenu::persist::ImageStore;
use knobmenu::storage;
use knobmenu::ui::display::{Oled, Panel};
use knobmenu::ui::encoder::{sample_encoder, KnobInput};
use knobmenu::ui::piezo::Piezo;
use knobmenu::Engine;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1 => twim::InterruptHandler<peripherals::TWISPI1>;
});

/// Encoder detents, pushed by `encoder_task`, drained by the engine.
static ROTARY: RotaryAccumulator = RotaryAccumulator::new();

static MENU_TREE: StaticCell<MenuTree> = StaticCell::new();

#[embassy_executor::task]
async fn encoder_task(a: Input<'static>, b: Input<'static>) -> ! {
    sample_encoder(a, b, &ROTARY).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("knobmenu starting");

    let tree = match default_tree() {
        Ok(tree) => MENU_TREE.init(tree),
        Err(e) => {
            error!("Menu tree rejected: {}", e);
            loop {
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    };

    // Flash-backed value image.
    let mut flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let mut image = ImageStore::<STORE_IMAGE_SIZE>::new();
    let stored = match storage::load_from_flash(&mut image, &mut flash).await {
        Ok(found) => found,
        Err(e) => {
            warn!("Value image unreadable ({}), using defaults", e);
            false
        }
    };

    let oled = Oled::new(Twim::new(
        p.TWISPI0,
        Irqs,
        p.P0_26,
        p.P0_27,
        twim::Config::default(),
    ));
    let panel = Panel::new(Twim::new(
        p.TWISPI1,
        Irqs,
        p.P0_30,
        p.P0_31,
        twim::Config::default(),
    ));

    let mut piezo = Piezo::new(SimplePwm::new_1ch(p.PWM0, p.P0_29));
    piezo.play_chime().await;

    let mut engine = Engine::new(tree, oled, panel, image, piezo);
    if stored {
        let read = engine.load();
        info!("Restored {} bytes of values", read);
    } else {
        let written = engine.save();
        info!("First run: wrote {} bytes of defaults", written);
    }
    if let Err(e) = storage::save_to_flash(engine.store_mut(), &mut flash).await {
        warn!("Initial flash sync failed: {}", e);
    }

    let enc_a = Input::new(p.P0_03, Pull::Up);
    let enc_b = Input::new(p.P0_04, Pull::Up);
    spawner.must_spawn(encoder_task(enc_a, enc_b));

    let mut input = KnobInput::new(Input::new(p.P0_28, Pull::Up), &ROTARY);

    loop {
        let tick = engine.tick(&mut input, Instant::now().as_millis());

        if engine.store().is_dirty() {
            if let Err(e) = storage::save_to_flash(engine.store_mut(), &mut flash).await {
                warn!("Flash sync failed: {}", e);
            }
        }

        let wake = Instant::now() + Duration::from_millis(tick.pace_ms);
        if let Some(stop) = engine.audio_mut().deadline() {
            if stop < wake {
                Timer::at(stop).await;
                engine.audio_mut().service();
            }
        }
        Timer::at(wake).await;
        engine.audio_mut().service();
    }
}
