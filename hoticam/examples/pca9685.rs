#![deny(unsafe_code)]
#![no_main]
#![no_std]

//! Servo bring-up: walks the pan servo through its calibration points, then
//! the absolute pulse limits, so each can be checked against the mount.

use defmt::info;
use defmt_rtt as _;
use hoticam::{config, err::log, pwm::pca9685::Pca9685Driver};
use hoticam_common::{
    Command, ServoConverter, ABSOLUTE_MAX_PULSE_WIDTH_US, ABSOLUTE_MIN_PULSE_WIDTH_US,
};
use panic_probe as _;
use pwm_pca9685::Channel;
use rtic_monotonics::systick_monotonic;
use rtic_monotonics::Monotonic;
systick_monotonic!(Mono, 1000);
use stm32f4xx_hal::{i2c::I2c1, prelude::*};

const HOLD_MS: u32 = 2000;

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true, dispatchers = [USART1])]
mod app {

    use super::*;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        pwm: Pca9685Driver<I2c1>,
        servo: ServoConverter<Channel>,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let dp = cx.device;
        let rcc = dp.RCC.constrain();
        let hse = config::HSE_MHZ.MHz();
        let sysclk = config::SYSCLK_MHZ.MHz();
        let clocks = rcc
            .cfgr
            .use_hse(hse)
            .sysclk(sysclk)
            .require_pll48clk()
            .freeze();

        let _syscfg = dp.SYSCFG.constrain();
        Mono::start(cx.core.SYST, sysclk.to_Hz());

        info!("pca 9865 servo test");
        let gpiob = dp.GPIOB.split();
        let gpioc = dp.GPIOC.split();

        let i2c1_scl = gpiob.pb8.into_alternate_open_drain();
        let i2c1_sda = gpiob.pb9.into_alternate_open_drain();

        info!("i2c1...");
        let i2c1 = I2c1::new(dp.I2C1, (i2c1_scl, i2c1_sda), 400.kHz(), &clocks);

        let pwm =
            Pca9685Driver::new(i2c1, config::PCA9685_ADDR, config::PCA9685_PRESCALE).unwrap();
        let servo = ServoConverter::new(
            config::PAN_CHANNEL,
            config::PAN_MIN,
            config::PAN_MID,
            config::PAN_MAX,
        )
        .unwrap();

        info!("pwm enable pin");
        let mut servo_en = gpioc.pc3.into_push_pull_output();
        servo_en.set_low();

        servo_task::spawn().unwrap();

        (Shared {}, Local { pwm, servo })
    }

    #[task(local = [pwm, servo])]
    async fn servo_task(cx: servo_task::Context) {
        let pwm = cx.local.pwm;
        let servo = cx.local.servo;
        let cal = *servo.calibration();

        let steps = [
            Command::Angle(cal.mid().angle_deg),
            Command::Angle(cal.min().angle_deg),
            Command::Angle(cal.mid().angle_deg),
            Command::Angle(cal.max().angle_deg),
            Command::PulseWidth(ABSOLUTE_MIN_PULSE_WIDTH_US),
            Command::PulseWidth(ABSOLUTE_MAX_PULSE_WIDTH_US),
        ];

        loop {
            for cmd in steps {
                let now = Mono::now();
                info!("{}", cmd);
                if let Err(e) = servo.issue(pwm, cmd) {
                    log::log_err(log::err_pwm_h(e));
                }
                if let Some(us) = servo.last_pulse_width_us() {
                    info!("  -> {} us", us);
                }
                Mono::delay_until(now + HOLD_MS.millis()).await;
            }
        }
    }
}
