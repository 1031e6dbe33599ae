use crate::types::TimeSlot;
use rand::Rng;

pub const FIRST_BANKING_HOUR: u32 = 9;
pub const LAST_BANKING_HOUR: u32 = 17;
pub const AVAILABILITY_RATE: f64 = 0.7;

/// Hourly slots from the requested hour until closing, each free with
/// probability [`AVAILABILITY_RATE`].
pub fn generate_time_slots<R: Rng + ?Sized>(
    date: &str,
    requested_hour: u32,
    rng: &mut R,
) -> Vec<TimeSlot> {
    let start_hour = FIRST_BANKING_HOUR.max(requested_hour);
    let end_hour = LAST_BANKING_HOUR.min((requested_hour + 5).max(LAST_BANKING_HOUR));

    (start_hour..=end_hour)
        .map(|hour| {
            let available = rng.gen_bool(AVAILABILITY_RATE);
            TimeSlot {
                id: format!("slot_{date}_{hour}00"),
                start_time: format!("{hour:02}:00"),
                end_time: format!("{:02}:00", hour + 1),
                available,
                booking_reference: (!available).then(|| format!("booked_{hour}")),
            }
        })
        .collect()
}

/// Hour component of an `HH:mm` string.
pub fn parse_hour(time: &str) -> Option<u32> {
    let (hour, minute) = time.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    (hour < 24 && minute < 60).then_some(hour)
}
