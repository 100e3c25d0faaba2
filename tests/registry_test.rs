//! Integration tests for the truck registry.

use std::sync::Arc;

use fleet_rs::error::Error;
use fleet_rs::manifest::FleetManifest;
use fleet_rs::registry::{FleetManager, RegisteredTruck, TruckManager};

#[test]
fn add_then_get() {
    let manager = TruckManager::new();
    manager.add_truck("NT1", 40).unwrap();

    let truck = manager.get_truck("NT1").unwrap();
    assert_eq!(
        truck,
        RegisteredTruck {
            id: "NT1".into(),
            cargo: 40
        }
    );
}

#[test]
fn duplicate_add_keeps_original_cargo() {
    let manager = TruckManager::new();
    manager.add_truck("NT1", 10).unwrap();

    let err = manager.add_truck("NT1", 99).unwrap_err();

    assert!(matches!(err, Error::AlreadyExists(ref id) if id == "NT1"));
    assert_eq!(manager.get_truck("NT1").unwrap().cargo, 10);
    assert_eq!(manager.len().unwrap(), 1);
}

#[test]
fn unknown_ids_are_not_found() {
    let manager = TruckManager::new();

    assert!(matches!(manager.get_truck("ghost"), Err(Error::NotFound(_))));
    assert!(matches!(manager.remove_truck("ghost"), Err(Error::NotFound(_))));
    assert!(matches!(
        manager.update_truck_cargo("ghost", 5),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn remove_and_update() {
    let manager = TruckManager::new();
    manager.add_truck("A", 0).unwrap();
    manager.add_truck("B", 0).unwrap();

    manager.update_truck_cargo("A", 250).unwrap();
    manager.remove_truck("B").unwrap();

    assert_eq!(manager.get_truck("A").unwrap().cargo, 250);
    assert!(matches!(manager.get_truck("B"), Err(Error::NotFound(_))));
    assert!(!manager.is_empty().unwrap());
}

#[test]
fn readers_see_old_or_new_cargo_during_update() {
    let manager = Arc::new(TruckManager::new());
    manager.add_truck("NT1", 100).unwrap();

    std::thread::scope(|s| {
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            s.spawn(move || {
                for _ in 0..1_000 {
                    let cargo = manager.get_truck("NT1").unwrap().cargo;
                    assert!(cargo == 100 || cargo == 200, "torn read: {cargo}");
                }
            });
        }
        let manager = Arc::clone(&manager);
        s.spawn(move || {
            manager.update_truck_cargo("NT1", 200).unwrap();
        });
    });

    assert_eq!(manager.get_truck("NT1").unwrap().cargo, 200);
}

#[test]
fn manifest_registers_sorted_listing() {
    let manager = TruckManager::new();
    FleetManifest::demo().register(&manager).unwrap();

    let ids: Vec<_> = manager
        .list_trucks()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["ET1", "ET2", "NT1", "NT2"]);

    // Registering the same manifest twice collides on the first id.
    assert!(matches!(
        FleetManifest::demo().register(&manager),
        Err(Error::AlreadyExists(_))
    ));
}
