use crate::{AttributeKind, mesh::locations::ComponentLocations};

#[test]
fn slots_accumulate_in_registration_order() {
    let mut locations = ComponentLocations::default();
    for slot in 0..10 {
        locations.register(AttributeKind::Position, 3, slot).unwrap();
    }
    locations.register(AttributeKind::Position, 1, 42).unwrap();

    assert_eq!(
        locations.slots(AttributeKind::Position, 3),
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]
    );
    assert_eq!(locations.slots(AttributeKind::Position, 1), [42]);
    assert_eq!(locations.get(AttributeKind::Position).registered_elements(), 2);
}

#[test]
fn kinds_are_independent() {
    let mut locations = ComponentLocations::default();
    locations.register(AttributeKind::Normal, 0, 7).unwrap();
    locations.register(AttributeKind::Color, 0, 8).unwrap();

    assert_eq!(locations.slots(AttributeKind::Normal, 0), [7]);
    assert_eq!(locations.slots(AttributeKind::Color, 0), [8]);
    for kind in [AttributeKind::Position, AttributeKind::TexCoord] {
        assert_eq!(locations.get(kind).registered_elements(), 0);
    }
}

#[test]
fn clear_forgets_everything() {
    let mut locations = ComponentLocations::default();
    for kind in AttributeKind::ALL {
        locations.register(kind, 5, 1).unwrap();
        locations.register(kind, 5, 2).unwrap();
    }
    locations.clear();

    for kind in AttributeKind::ALL {
        assert_eq!(locations.get(kind).registered_elements(), 0);
    }
}

#[test]
#[should_panic]
fn unregistered_elements_are_rejected() {
    let mut locations = ComponentLocations::default();
    locations.register(AttributeKind::TexCoord, 4, 0).unwrap();
    locations.slots(AttributeKind::TexCoord, 2);
}

#[test]
#[should_panic]
fn elements_past_the_end_are_rejected() {
    let locations = ComponentLocations::default();
    locations.slots(AttributeKind::TexCoord, 0);
}
