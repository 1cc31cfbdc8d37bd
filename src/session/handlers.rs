//! Message handlers for a partition editing session
//!
//! `update()` is the only entry point that mutates a [`Session`]. Each
//! message runs to completion before the next one is handled.

use super::messages::{Msg, PartitionMsg, SelectMsg};
use super::state::{InputError, Outcome, Session};

/// Result type for message handlers
pub type HandlerResult = Result<Outcome, InputError>;

/// Apply one message to the session
pub fn update(session: &mut Session, msg: Msg) -> HandlerResult {
    log::debug!("Handling {:?}", msg);
    let result = match msg {
        Msg::Partition(msg) => handle_partition(session, msg),
        Msg::Select(msg) => handle_select(session, msg),
    };
    if let Err(err) = &result {
        log::info!("Rejected: {}", err);
    }
    debug_assert!(session.partition.check_invariant(&session.catalog));
    result
}

fn handle_partition(session: &mut Session, msg: PartitionMsg) -> HandlerResult {
    match msg {
        PartitionMsg::Resize(divisions) => session.resize(divisions),
        PartitionMsg::Drop { unit, destination } => session.drop_unit(&unit, destination),
        PartitionMsg::Rename { index, name } => session.rename(index, &name),
        PartitionMsg::Reset => Ok(session.reset()),
        PartitionMsg::LoadPreset(region_type) => session.load_region_preset(&region_type),
    }
}

fn handle_select(session: &mut Session, msg: SelectMsg) -> HandlerResult {
    match msg {
        SelectMsg::Lasso(points) => session.select_lasso(&points),
        SelectMsg::Pick(unit) => session.pick(&unit),
        SelectMsg::Clear => Ok(session.clear_selection()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Datasets;
    use crate::domain::{Extent, Location, Point, Unit, UnitCatalog};

    fn session() -> Session {
        let units = (0..6)
            .map(|i| {
                Unit::new(
                    format!("u{}", i),
                    format!("Unit {}", i),
                    Extent::at(Point::new(i as f64, i as f64)),
                )
            })
            .collect();
        Session::new(
            Datasets {
                catalog: UnitCatalog::new(units),
                attributes: None,
                regions: None,
            },
            3,
        )
    }

    #[test]
    fn test_scripted_session() {
        let mut session = session();
        let script = vec![
            Msg::resize(5),
            Msg::lasso(vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 2.0),
            ]),
            Msg::drop_unit("u1", Location::Group(5)),
            Msg::drop_unit("u4", Location::Group(4)),
            Msg::rename(5, "Centro"),
            Msg::resize(4),
        ];
        for msg in script {
            update(&mut session, msg).unwrap();
        }
        assert_eq!(session.partition.k(), 4);
        assert_eq!(session.partition.location_of("u0"), Some(Location::Pool));
        assert_eq!(session.partition.location_of("u4"), Some(Location::Group(4)));
        assert_eq!(session.partition.pool().len(), 5);
        assert!(session.selection.is_empty());
    }

    #[test]
    fn test_rejected_messages_leave_state_alone() {
        let mut session = session();
        let before = session.partition.pool().to_vec();
        assert!(update(&mut session, Msg::resize(0)).is_err());
        assert!(update(&mut session, Msg::drop_unit("missing", Location::Pool)).is_err());
        assert!(update(&mut session, Msg::rename(9, "x")).is_err());
        assert!(update(&mut session, Msg::lasso(vec![Point::default()])).is_err());
        assert_eq!(
            update(&mut session, Msg::load_preset("any")),
            Err(InputError::RegionsUnavailable)
        );
        assert_eq!(session.partition.pool(), before.as_slice());
        assert_eq!(session.partition.k(), 3);
    }

    #[test]
    fn test_pick_then_clear() {
        let mut session = session();
        update(&mut session, Msg::pick("u2")).unwrap();
        assert!(session.selection.contains("u2"));
        assert_eq!(
            update(&mut session, Msg::clear_selection()),
            Ok(Outcome::SelectionCleared)
        );
        assert!(session.selection.is_empty());
    }

    #[test]
    fn test_reset_message() {
        let mut session = session();
        update(&mut session, Msg::resize(7)).unwrap();
        update(&mut session, Msg::drop_unit("u3", Location::Group(7))).unwrap();
        assert_eq!(
            update(&mut session, Msg::reset()),
            Ok(Outcome::Reset { divisions: 3 })
        );
        assert_eq!(session.partition.location_of("u3"), Some(Location::Pool));
    }
}
