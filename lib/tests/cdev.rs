// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Live tests require the gpio-sim kernel module and the permissions to create
// simulated chips, so are ignored by default.
// Run them with `cargo test -- --ignored`.

use gpiosim::{Level as SimLevel, Simpleton};
use panthyr_gpio::{Bank, Cdev, Error, Level, Location, Mapping, Mode, Pin};

// A mapping with all outputs on chip 0.
fn mapping() -> Mapping {
    "0:1,0:2,0:3,0:4,0:5,0:6".parse().unwrap()
}

fn provider(s: &Simpleton) -> Cdev {
    let mut cdev = Cdev::new();
    cdev.with_chip(0, s.dev_path()).with_consumer("panthyr-gpio-test");
    cdev
}

#[test]
#[ignore = "requires the gpio-sim kernel module"]
fn pin_output() {
    let s = Simpleton::new(8);
    let cdev = provider(&s);

    let mut pin = Pin::new(&cdev, Location::new(0, 3), Mode::Output, Some(true)).unwrap();
    assert_eq!(s.get_level(3).unwrap(), SimLevel::High);

    pin.turn_off().unwrap();
    assert_eq!(s.get_level(3).unwrap(), SimLevel::Low);
    assert_eq!(pin.read_current_value().unwrap(), Level::Low);

    pin.turn_on().unwrap();
    assert_eq!(s.get_level(3).unwrap(), SimLevel::High);
    assert_eq!(pin.read_current_value().unwrap(), Level::High);
}

#[test]
#[ignore = "requires the gpio-sim kernel module"]
fn pin_busy() {
    let s = Simpleton::new(8);
    let cdev = provider(&s);

    let _pin = Pin::new(&cdev, Location::new(0, 2), Mode::Output, None).unwrap();
    let err = Pin::new(&cdev, Location::new(0, 2), Mode::Output, None).unwrap_err();
    assert!(matches!(err, Error::AcquisitionFailed { .. }), "{err:?}");
}

#[test]
#[ignore = "requires the gpio-sim kernel module"]
fn pin_offset_out_of_range() {
    let s = Simpleton::new(4);
    let cdev = provider(&s);

    let err = Pin::new(&cdev, Location::new(0, 4), Mode::Output, None).unwrap_err();
    assert!(matches!(err, Error::AcquisitionFailed { .. }), "{err:?}");
}

#[test]
#[ignore = "requires the gpio-sim kernel module"]
fn bank_set_and_status() {
    let s = Simpleton::new(8);
    let cdev = provider(&s);

    let mut bank = Bank::new(&cdev, &mapping(), Mode::Output).unwrap();
    for res in bank.set_high(&[2, 5]) {
        res.1.unwrap();
    }
    assert_eq!(s.get_level(2).unwrap(), SimLevel::High);
    assert_eq!(s.get_level(5).unwrap(), SimLevel::High);
    assert_eq!(s.get_level(1).unwrap(), SimLevel::Low);

    for res in bank.set_low(&[2]) {
        res.1.unwrap();
    }
    assert_eq!(s.get_level(2).unwrap(), SimLevel::Low);

    let levels: Vec<Level> = bank.status().into_iter().map(|(_, v)| v.unwrap()).collect();
    assert_eq!(
        levels,
        vec![
            Level::Low,
            Level::Low,
            Level::Low,
            Level::Low,
            Level::High,
            Level::Low
        ]
    );
}

#[test]
#[ignore = "requires the gpio-sim kernel module"]
fn bank_rollback() {
    let s = Simpleton::new(8);
    let cdev = provider(&s);

    // output 4 is already claimed
    let held = Pin::new(&cdev, Location::new(0, 4), Mode::Output, None).unwrap();
    assert!(Bank::new(&cdev, &mapping(), Mode::Output).is_err());
    drop(held);

    // so all lines should be free again
    let bank = Bank::new(&cdev, &mapping(), Mode::Output).unwrap();
    assert_eq!(bank.len(), 6);
}
