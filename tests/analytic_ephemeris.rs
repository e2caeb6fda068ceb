mod common;

use common::sao_paulo;
use hifitime::{Epoch, Unit};
use skywatch::bodies::Body;
use skywatch::ephemeris::analytic::AnalyticEphemeris;
use skywatch::ephemeris::{EphemerisOracle, RiseSetDirection};
use skywatch::observers::Observer;
use skywatch::visibility::{Classification, ClassifierSettings, VisibilityClassifier};

/// 2025-06-21 20:00 in São Paulo (UTC−3).
fn sao_paulo_evening() -> Epoch {
    Epoch::from_gregorian_utc_hms(2025, 6, 21, 23, 0, 0)
}

fn sao_paulo_settings() -> ClassifierSettings {
    ClassifierSettings {
        utc_offset: Unit::Hour * -3.0,
        ..ClassifierSettings::default()
    }
}

#[test]
fn sao_paulo_winter_evening() {
    let oracle = AnalyticEphemeris::new();
    let observer = sao_paulo();
    let epoch = sao_paulo_evening();

    let sun = oracle.horizontal(Body::Sun, epoch, &observer).unwrap();
    assert!(sun.altitude < 0.0, "sun altitude {}", sun.altitude);

    let classifier = VisibilityClassifier::new(oracle, sao_paulo_settings());
    let result = classifier.classify(&observer, epoch);

    // every body above the horizon at night is listed as visible now
    for body in Body::TRACKED {
        let position = classifier.oracle().horizontal(body, epoch, &observer).unwrap();
        if position.altitude > 0.0 {
            assert_eq!(
                result.classification_of(body),
                Some(Classification::Now),
                "{body} at {:.1}°",
                position.altitude
            );
        }
    }

    // the Sun rises tomorrow morning, within 12 h
    let sun_entry = result
        .soon
        .iter()
        .find(|entry| entry.body == Body::Sun)
        .expect("sun should be rising soon");
    assert!(
        sun_entry.display_time.starts_with("rises at 06:"),
        "{}",
        sun_entry.display_time
    );
}

#[test]
fn rise_precedes_upward_motion() {
    let oracle = AnalyticEphemeris::new();
    let observer = sao_paulo();
    let start = sao_paulo_evening();

    for body in Body::TRACKED {
        let rise = oracle
            .search_rise_set(body, &observer, RiseSetDirection::Rise, start, 1.0)
            .unwrap();
        let Some(rise) = rise else { continue };

        assert!(rise > start && rise <= start + Unit::Day * 1.0);

        let before = oracle
            .horizontal(body, rise - Unit::Minute * 30, &observer)
            .unwrap();
        let after = oracle
            .horizontal(body, rise + Unit::Minute * 30, &observer)
            .unwrap();
        assert!(before.altitude < after.altitude, "{body}");
    }
}

#[test]
fn every_body_rises_and_sets_at_mid_latitude() {
    let oracle = AnalyticEphemeris::new();
    let observer = sao_paulo();
    let start = sao_paulo_evening();

    // at 23.5° S nothing tracked is circumpolar: a two-day window always holds both events
    for body in Body::TRACKED {
        for direction in [RiseSetDirection::Rise, RiseSetDirection::Set] {
            let event = oracle
                .search_rise_set(body, &observer, direction, start, 2.0)
                .unwrap();
            assert!(event.is_some(), "{body} {direction:?}");
        }
    }
}

#[test]
fn midnight_sun_stays_visible_without_set_time() {
    let oracle = AnalyticEphemeris::new();
    let tromso = Observer::new(69.65, 18.96, 0.0).unwrap();
    // local midnight (UTC+2)
    let epoch = Epoch::from_gregorian_utc_hms(2025, 6, 21, 22, 0, 0);

    let classifier = VisibilityClassifier::new(oracle, ClassifierSettings::default());
    let result = classifier.classify(&tromso, epoch);

    let sun = result
        .now
        .iter()
        .find(|entry| entry.body == Body::Sun)
        .expect("midnight sun");
    assert_eq!(sun.display_time, "until --:--");
}

#[test]
fn out_of_range_epoch_excludes_every_body() {
    let classifier = VisibilityClassifier::new(AnalyticEphemeris::new(), ClassifierSettings::default());
    let result = classifier.classify(&sao_paulo(), Epoch::from_gregorian_utc_at_midnight(2200, 1, 1));
    assert!(result.is_empty());
}
