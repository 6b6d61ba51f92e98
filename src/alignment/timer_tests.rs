use super::*;

#[test]
fn when_the_timer_was_never_reset_it_should_report_zero() {
    let timer = Timer::new();

    assert_eq!(timer.elapsed_at(Instant::now()), Duration::ZERO);
}

#[test]
fn when_the_timer_is_reset_it_should_measure_from_the_reset() {
    let start = Instant::now();
    let mut timer = Timer::new();

    timer.reset_at(start);
    assert_eq!(
        timer.elapsed_at(start + Duration::from_millis(250)),
        Duration::from_millis(250)
    );

    timer.reset_at(start + Duration::from_secs(1));
    assert_eq!(
        timer.elapsed_at(start + Duration::from_millis(1500)),
        Duration::from_millis(500)
    );
}

#[test]
fn when_now_is_before_the_reset_it_should_report_zero() {
    let start = Instant::now();
    let mut timer = Timer::new();
    timer.reset_at(start + Duration::from_secs(1));

    assert_eq!(timer.elapsed_at(start), Duration::ZERO);
}
