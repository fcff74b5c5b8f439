use defmt::info;
use hoticam::{config, err::log};
use hoticam_common::{Command, ExploreSweep};
use rtic::Mutex;
use rtic_monotonics::Monotonic;
use stm32f4xx_hal::prelude::*;

use crate::app::explore_task;
use crate::Mono;

/// Walks the explore raster forever, one pan and one tilt command per step.
pub async fn explore_task_fn(cx: &mut explore_task::Context<'_>) {
    info!("Explore task started");
    let sweep = ExploreSweep::default();
    info!("{} targets per pass", sweep.pass_len());

    let pan = &mut *cx.local.pan;
    let tilt = &mut *cx.local.tilt;

    for (pan_deg, tilt_deg) in sweep.cycle() {
        let now = Mono::now();

        let res = cx.shared.pwm.lock(|pwm| {
            pan.issue(pwm, Command::Angle(pan_deg))?;
            tilt.issue(pwm, Command::Angle(tilt_deg))
        });
        if let Err(e) = res {
            log::log_err(log::err_pwm_h(e));
            // chip state is unknown after a bus fault, rewrite both next step
            pan.forget_last_pulse_width();
            tilt.forget_last_pulse_width();
        }

        Mono::delay_until(now + config::EXPLORE_STEP_MS.millis()).await;
    }
}
