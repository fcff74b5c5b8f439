#![deny(unsafe_code)]
#![no_main]
#![no_std]

/// modules
use hoticam::{config, err::log, pwm::pca9685::Pca9685Driver};
use hoticam_common::ServoConverter;

mod explore;

/// configuration
use defmt::info;
use defmt_rtt as _;
use panic_probe as _;

/// system
use rtic_monotonics::systick_monotonic;
use rtic_monotonics::Monotonic;
systick_monotonic!(Mono, 1000);

/// hal
use pwm_pca9685::Channel;
use stm32f4xx_hal::{gpio, i2c::I2c1, prelude::*};

/// type
type PwmDriver = Pca9685Driver<I2c1>;

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true, dispatchers = [USART1])]
mod app {

    use super::*;

    #[shared]
    struct Shared {
        pwm: PwmDriver,
    }

    #[local]
    struct Local {
        pan: ServoConverter<Channel>,
        tilt: ServoConverter<Channel>,
        led: gpio::PC13<gpio::Output>,
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

        let gpiob = dp.GPIOB.split();
        let gpioc = dp.GPIOC.split();

        // Calibration is fixed at build time; a bad table is a build mistake.
        let pan = match ServoConverter::new(
            config::PAN_CHANNEL,
            config::PAN_MIN,
            config::PAN_MID,
            config::PAN_MAX,
        ) {
            Ok(s) => s,
            Err(e) => {
                log::log_err(log::err_cal_h(e));
                panic!();
            }
        };
        let tilt = match ServoConverter::new(
            config::TILT_CHANNEL,
            config::TILT_MIN,
            config::TILT_MID,
            config::TILT_MAX,
        ) {
            Ok(s) => s,
            Err(e) => {
                log::log_err(log::err_cal_h(e));
                panic!();
            }
        };

        // PCA9685
        info!("i2c1...");
        let i2c1_scl = gpiob.pb8.into_alternate_open_drain();
        let i2c1_sda = gpiob.pb9.into_alternate_open_drain();
        let i2c1 = I2c1::new(
            dp.I2C1,
            (i2c1_scl, i2c1_sda),
            config::I2C_FREQ_KHZ.kHz(),
            &clocks,
        );
        let pwm = match Pca9685Driver::new(i2c1, config::PCA9685_ADDR, config::PCA9685_PRESCALE) {
            Ok(p) => p,
            Err(e) => {
                log::log_err(log::err_pwm_h(e));
                panic!();
            }
        };
        // PCA9685

        info!("pwm enable pin");
        let mut servo_en = gpioc.pc3.into_push_pull_output();
        servo_en.set_low();

        let led = gpioc.pc13.into_push_pull_output();

        if explore_task::spawn().is_err() || heartbeat_task::spawn().is_err() {
            log::log_err(log::err_os_h(log::RticErr::SpawnFail));
            panic!();
        }

        (Shared { pwm }, Local { pan, tilt, led })
    }

    #[task(priority = 1, shared = [pwm], local = [pan, tilt])]
    async fn explore_task(mut cx: explore_task::Context) {
        explore::explore_task_fn(&mut cx).await;
    }

    #[task(priority = 1, local = [led])]
    async fn heartbeat_task(cx: heartbeat_task::Context) {
        loop {
            let now = Mono::now();
            cx.local.led.toggle();
            Mono::delay_until(now + config::HEARTBEAT_MS.millis()).await;
        }
    }
}
