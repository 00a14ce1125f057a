//! Recurring background jobs. Call `spawn_all` once during startup.

use crate::services::BookingService;

/// Spawn all background tasks. Detaches via `tokio::spawn`; does not block.
pub fn spawn_all(booking_service: BookingService, sweep_interval_secs: u64) {
    // Past-due bookings get completed on an interval so loyalty keeps
    // accruing even when no manager presses the button. The sweep is
    // idempotent, overlapping with the admin endpoint is harmless.
    tokio::spawn(async move {
        loop {
            match booking_service.auto_complete_past_due().await {
                Ok(summary) if summary.completed_bookings > 0 => log::info!(
                    "Auto-completed {} bookings ({} rewards earned)",
                    summary.completed_bookings,
                    summary.rewards_earned
                ),
                Ok(_) => {}
                Err(e) => log::error!("Auto-complete sweep failed: {e:?}"),
            }
            tokio::time::sleep(std::time::Duration::from_secs(sweep_interval_secs)).await;
        }
    });
}
