/*
 * Unit tests for the coordinator and the hall call dispatcher
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Time is simulated, so every expected instant below is exact.
 *
 * Tests:
 *  - test_coordinator_init
 *  - test_cab_call_round_trip
 *  - test_hall_call_tie_goes_to_first_car
 *  - test_homing_from_upper_floor
 *  - test_hall_call_at_top_floor
 *  - test_door_cycle_in_place
 *  - test_eta_costs
 *  - test_choose_car_strictly_cheaper
 *  - test_hall_press_ignored
 *  - test_cab_press_toggles
 *  - test_door_task_restarts_on_state_change
 *  - test_invariants_hold_over_long_run
 *  - test_snapshot_json
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod coordinator_tests {
    use crate::config::ElevatorConfig;
    use crate::coordinator::dispatcher::{calculate_eta, choose_car};
    use crate::elevator::door::DoorPhase;
    use crate::elevator::TaskKind;
    use crate::shared::Direction::{Down, Stop, Up};
    use crate::shared::DoorState::{Closed, Closing, Open, Opening};
    use crate::shared::{CarId, FloorSet};
    use crate::{Car, Command, Coordinator};

    fn setup_coordinator() -> Coordinator {
        Coordinator::new(&ElevatorConfig::default())
    }

    fn parked_car(id: CarId, floor: u8) -> Car {
        let mut car = Car::new(id, 1);
        car.current_floor = floor;
        car.target_floor = floor;
        car.absolute_position = floor as f64;
        car.door_state = Closed;
        car.door_progress = 0.0;
        car
    }

    fn advance_to(coordinator: &mut Coordinator, time_ms: u64) {
        let now = coordinator.now_ms();
        assert!(time_ms >= now);
        coordinator.advance(time_ms - now);
    }

    fn car(coordinator: &Coordinator, id: CarId) -> &Car {
        coordinator.car(id).unwrap()
    }

    fn assert_invariants(coordinator: &Coordinator) {
        let a = car(coordinator, CarId::A);
        let b = car(coordinator, CarId::B);
        for car in [a, b] {
            assert!(car.absolute_position >= 1.0 && car.absolute_position <= 6.0);
            assert!(car.door_progress >= 0.0 && car.door_progress <= 1.0);
            assert!((1..=6).contains(&car.current_floor));
            if car.is_moving {
                assert_eq!(car.door_state, Closed, "car {} moving with doors {:?}", car.id, car.door_state);
            } else {
                assert_eq!(car.absolute_position, car.current_floor as f64);
            }
        }

        // Every lit button is owned by exactly one car
        assert_eq!(a.assigned_calls_up.union(b.assigned_calls_up), coordinator.registry().call_buttons_up());
        assert_eq!(a.assigned_calls_down.union(b.assigned_calls_down), coordinator.registry().call_buttons_down());
        assert!(a.assigned_calls_up.iter().all(|floor| !b.assigned_calls_up.contains(floor)));
        assert!(a.assigned_calls_down.iter().all(|floor| !b.assigned_calls_down.contains(floor)));
    }

    #[test]
    fn test_coordinator_init() {
        // Act
        let coordinator = setup_coordinator();

        // Assert
        assert_eq!(coordinator.now_ms(), 0);
        for id in CarId::ALL {
            let car = car(&coordinator, id);
            assert_eq!(car.current_floor, 1);
            assert_eq!(car.door_state, Open);
            assert_eq!(car.door_progress, 1.0);
            assert_eq!(car.direction, Stop);
            assert!(!car.is_moving);
            assert!(!car.has_requests());
        }
        assert!(coordinator.registry().call_buttons_up().is_empty());
        assert!(coordinator.registry().call_buttons_down().is_empty());
    }

    #[test]
    fn test_cab_call_round_trip() {
        // Purpose: A trip from floor 1 to 4, a dwell, and the trip back home after the idle timeout

        // Arrange
        let mut coordinator = setup_coordinator();

        // Act & Assert
        assert!(coordinator.press_cabin_button(CarId::A, 4));
        assert_eq!(car(&coordinator, CarId::A).door_state, Closing);

        advance_to(&mut coordinator, 500);
        let a = car(&coordinator, CarId::A);
        assert_eq!(a.door_state, Closed);
        assert!(a.is_moving);
        assert_eq!(a.direction, Up);
        assert_eq!(a.target_floor, 4);

        advance_to(&mut coordinator, 6483);
        let a = car(&coordinator, CarId::A);
        assert!(a.is_moving);
        assert_eq!(a.current_floor, 3);
        assert!(a.absolute_position < 4.0);

        advance_to(&mut coordinator, 6484);
        let a = car(&coordinator, CarId::A);
        assert!(!a.is_moving);
        assert_eq!(a.current_floor, 4);
        assert_eq!(a.absolute_position, 4.0);
        assert_eq!(a.door_state, Opening);
        assert_eq!(a.direction, Stop);
        assert!(a.queued_floors.is_empty());

        advance_to(&mut coordinator, 6984);
        assert_eq!(car(&coordinator, CarId::A).door_progress, 1.0);
        assert_eq!(car(&coordinator, CarId::A).door_state, Opening);

        advance_to(&mut coordinator, 8984);
        assert_eq!(car(&coordinator, CarId::A).door_state, Closing);

        advance_to(&mut coordinator, 9484);
        assert_eq!(car(&coordinator, CarId::A).door_state, Closed);

        advance_to(&mut coordinator, 13399);
        assert!(!car(&coordinator, CarId::A).is_moving);

        advance_to(&mut coordinator, 13400);
        let a = car(&coordinator, CarId::A);
        assert!(a.is_moving);
        assert_eq!(a.direction, Down);
        assert_eq!(a.queued_floors.to_vec(), vec![1]);

        // Car B never left home
        let b = car(&coordinator, CarId::B);
        assert_eq!(b.current_floor, 1);
        assert_eq!(b.door_state, Open);
    }

    #[test]
    fn test_hall_call_tie_goes_to_first_car() {
        // Arrange
        let config = ElevatorConfig::default();
        let mut coordinator =
            Coordinator::with_cars(vec![parked_car(CarId::A, 1), parked_car(CarId::B, 5)], &config);

        // Act
        let accepted = coordinator.press_hall_button(3, Up);

        // Assert
        assert!(accepted);
        let a = car(&coordinator, CarId::A);
        assert_eq!(a.assigned_calls_up.to_vec(), vec![3]);
        assert!(car(&coordinator, CarId::B).assigned_calls_up.is_empty());
        assert!(coordinator.registry().is_lit(3, Up));
        assert!(a.is_moving);
        assert_eq!(a.direction, Up);
        assert_eq!(a.target_floor, 3);
    }

    #[test]
    fn test_homing_from_upper_floor() {
        // Arrange
        let config = ElevatorConfig::default();
        let mut coordinator =
            Coordinator::with_cars(vec![parked_car(CarId::A, 5), Car::new(CarId::B, 1)], &config);

        // Act & Assert
        advance_to(&mut coordinator, 3999);
        assert!(!car(&coordinator, CarId::A).is_moving);
        assert_eq!(coordinator.elevator(CarId::A).unwrap().homing_idle_ms(), 3900);

        advance_to(&mut coordinator, 4000);
        let a = car(&coordinator, CarId::A);
        assert!(a.is_moving);
        assert_eq!(a.direction, Down);
        assert_eq!(a.queued_floors.to_vec(), vec![1]);

        advance_to(&mut coordinator, 11983);
        assert!(car(&coordinator, CarId::A).is_moving);

        advance_to(&mut coordinator, 11984);
        let a = car(&coordinator, CarId::A);
        assert_eq!(a.current_floor, 1);
        assert_eq!(a.door_state, Opening);

        advance_to(&mut coordinator, 14484);
        let a = car(&coordinator, CarId::A);
        assert_eq!(a.door_state, Open);
        assert_eq!(a.door_progress, 1.0);
        assert_eq!(a.direction, Stop);
        assert!(!a.has_requests());
    }

    #[test]
    fn test_hall_call_at_top_floor() {
        // Arrange
        let mut coordinator = setup_coordinator();

        // Act
        assert!(coordinator.press_hall_button(6, Down));

        // Assert
        assert_eq!(car(&coordinator, CarId::A).assigned_calls_down.to_vec(), vec![6]);
        assert_eq!(car(&coordinator, CarId::A).door_state, Closing);

        advance_to(&mut coordinator, 10483);
        let a = car(&coordinator, CarId::A);
        assert!(a.is_moving);
        assert_eq!(a.current_floor, 5);

        advance_to(&mut coordinator, 10484);
        let a = car(&coordinator, CarId::A);
        assert_eq!(a.current_floor, 6);
        assert_eq!(a.absolute_position, 6.0);
        assert_eq!(a.door_state, Opening);
        assert_eq!(a.direction, Stop);
        assert!(a.assigned_calls_down.is_empty());
        assert!(!coordinator.registry().is_lit(6, Down));
    }

    #[test]
    fn test_door_cycle_in_place() {
        // Purpose: A cabin request at the current floor opens the doors without moving

        // Arrange
        let config = ElevatorConfig::default();
        let mut coordinator =
            Coordinator::with_cars(vec![parked_car(CarId::A, 3), Car::new(CarId::B, 1)], &config);

        // Act
        assert!(coordinator.press_cabin_button(CarId::A, 3));

        // Assert
        let a = car(&coordinator, CarId::A);
        assert_eq!(a.door_state, Opening);
        assert!(a.queued_floors.is_empty());

        advance_to(&mut coordinator, 499);
        assert!(car(&coordinator, CarId::A).door_progress < 1.0);
        assert!(matches!(
            coordinator.elevator(CarId::A).unwrap().door_phase(),
            Some(DoorPhase::Animating { .. })
        ));

        advance_to(&mut coordinator, 500);
        assert_eq!(car(&coordinator, CarId::A).door_progress, 1.0);
        assert_eq!(car(&coordinator, CarId::A).door_state, Opening);
        assert_eq!(coordinator.elevator(CarId::A).unwrap().door_phase(), Some(DoorPhase::Dwelling));

        advance_to(&mut coordinator, 2499);
        assert_eq!(car(&coordinator, CarId::A).door_state, Opening);

        advance_to(&mut coordinator, 2500);
        assert_eq!(car(&coordinator, CarId::A).door_state, Closing);

        advance_to(&mut coordinator, 3000);
        let a = car(&coordinator, CarId::A);
        assert_eq!(a.door_state, Closed);
        assert_eq!(a.door_progress, 0.0);
        assert!(!a.is_moving);
    }

    #[test]
    fn test_eta_costs() {
        // Purpose: Verify each term of the dispatch cost

        // Idle with doors closed: distance minus the ready bonus
        let parked = parked_car(CarId::A, 2);
        assert_eq!(calculate_eta(&parked, 5, Up), 25);

        // Doors open elsewhere: no bonus
        let mut open = parked_car(CarId::A, 2);
        open.door_state = Open;
        open.door_progress = 1.0;
        assert_eq!(calculate_eta(&open, 5, Up), 30);

        // Moving away from the call
        let mut moving = parked_car(CarId::A, 3);
        moving.is_moving = true;
        moving.direction = Up;
        assert_eq!(calculate_eta(&moving, 2, Up), 70);

        // Moving towards the call, against its direction
        assert_eq!(calculate_eta(&moving, 5, Down), 50);

        // Moving towards the call, with its direction
        assert_eq!(calculate_eta(&moving, 5, Up), 20);

        // Load
        moving.queued_floors = [4, 6].into_iter().collect::<FloorSet>();
        assert_eq!(calculate_eta(&moving, 5, Up), 30);

        // Standing open at the call floor costs nothing whatever the load
        open.queued_floors.insert(6);
        open.assigned_calls_down.insert(4);
        assert_eq!(calculate_eta(&open, 2, Up), 0);
    }

    #[test]
    fn test_choose_car_strictly_cheaper() {
        // Arrange
        let a = parked_car(CarId::A, 1);
        let b = parked_car(CarId::B, 4);

        // Act & Assert
        assert_eq!(choose_car(3, Up, [&a, &b]), Some(CarId::B));
        assert_eq!(choose_car(2, Up, [&a, &b]), Some(CarId::A));

        // Equal cost keeps the first listed car, every time
        let b = parked_car(CarId::B, 5);
        for _ in 0..10 {
            assert_eq!(choose_car(3, Down, [&a, &b]), Some(CarId::A));
        }
        assert_eq!(choose_car(3, Down, [&b, &a]), Some(CarId::B));
        assert_eq!(choose_car(3, Down, Vec::<&Car>::new()), None);
    }

    #[test]
    fn test_hall_press_ignored() {
        // Arrange
        let mut coordinator = setup_coordinator();

        // Act & Assert
        // Both cars stand open at floor 1
        assert!(!coordinator.press_hall_button(1, Up));
        // No such buttons
        assert!(!coordinator.press_hall_button(6, Up));
        assert!(!coordinator.press_hall_button(1, Down));
        assert!(!coordinator.press_hall_button(7, Down));
        assert!(!coordinator.press_hall_button(3, Stop));
        assert!(coordinator.registry().call_buttons_up().is_empty());

        // Already lit
        assert!(coordinator.press_hall_button(3, Up));
        let before = car(&coordinator, CarId::B).clone();
        assert!(!coordinator.press_hall_button(3, Up));
        assert_eq!(car(&coordinator, CarId::A).assigned_calls_up.to_vec(), vec![3]);
        assert_eq!(car(&coordinator, CarId::B), &before);
    }

    #[test]
    fn test_cab_press_toggles() {
        // Arrange
        let mut coordinator = setup_coordinator();

        // Act & Assert
        // Already open at floor 1
        assert!(!coordinator.press_cabin_button(CarId::A, 1));
        assert!(!coordinator.press_cabin_button(CarId::A, 7));
        assert!(!car(&coordinator, CarId::A).has_requests());

        assert!(coordinator.press_cabin_button(CarId::A, 4));
        assert_eq!(car(&coordinator, CarId::A).queued_floors.to_vec(), vec![4]);
        assert!(coordinator.press_cabin_button(CarId::A, 4));
        assert!(car(&coordinator, CarId::A).queued_floors.is_empty());

        // Through the command interface
        assert!(coordinator.handle_command(Command::CabButton { car: CarId::B, floor: 2 }));
        assert_eq!(car(&coordinator, CarId::B).queued_floors.to_vec(), vec![2]);
        assert!(!coordinator.handle_command(Command::Terminate));
    }

    #[test]
    fn test_door_task_restarts_on_state_change() {
        // Purpose: Each door state change cancels the running door cycle and starts a new one

        // Arrange
        let mut coordinator = setup_coordinator();
        let initial = coordinator.elevator(CarId::A).unwrap().generation(TaskKind::Door);

        // Act
        coordinator.press_cabin_button(CarId::A, 4);
        let after_close = coordinator.elevator(CarId::A).unwrap().generation(TaskKind::Door);
        advance_to(&mut coordinator, 500);
        let after_closed = coordinator.elevator(CarId::A).unwrap().generation(TaskKind::Door);

        // Assert
        assert_eq!(after_close, initial + 1);
        assert_eq!(after_closed, initial + 2);
        assert_eq!(coordinator.elevator(CarId::A).unwrap().door_phase(), None);
        // Car B's door never changed state
        assert_eq!(coordinator.elevator(CarId::B).unwrap().generation(TaskKind::Door), initial);
    }

    #[test]
    fn test_invariants_hold_over_long_run() {
        // Arrange
        let mut coordinator = setup_coordinator();
        fn step_until(coordinator: &mut Coordinator, time_ms: u64) {
            while coordinator.now_ms() < time_ms {
                coordinator.advance((time_ms - coordinator.now_ms()).min(16));
                assert_invariants(coordinator);
            }
        }

        // Act
        assert!(coordinator.press_hall_button(4, Down));
        assert!(coordinator.press_cabin_button(CarId::B, 3));
        assert_invariants(&coordinator);
        step_until(&mut coordinator, 1000);
        assert!(coordinator.press_hall_button(2, Up));
        assert!(coordinator.press_cabin_button(CarId::A, 6));
        assert_invariants(&coordinator);
        step_until(&mut coordinator, 3000);
        assert!(coordinator.press_hall_button(5, Down));
        step_until(&mut coordinator, 93000);

        // Assert
        for id in CarId::ALL {
            let car = car(&coordinator, id);
            assert_eq!(car.current_floor, 1);
            assert_eq!(car.door_state, Open);
            assert_eq!(car.direction, Stop);
            assert!(!car.is_moving);
            assert!(!car.has_requests());
        }
        assert!(coordinator.registry().call_buttons_up().is_empty());
        assert!(coordinator.registry().call_buttons_down().is_empty());
    }

    #[test]
    fn test_snapshot_json() {
        // Arrange
        let mut coordinator = setup_coordinator();
        coordinator.press_hall_button(3, Up);

        // Act
        let json = serde_json::to_value(coordinator.snapshot()).unwrap();

        // Assert
        assert_eq!(json["timeMs"], 0);
        assert_eq!(json["callButtonsUp"], serde_json::json!([3]));
        assert_eq!(json["callButtonsDown"], serde_json::json!([]));
        assert_eq!(json["cars"][0]["id"], "A");
        assert_eq!(json["cars"][0]["doorState"], "closing");
        assert_eq!(json["cars"][0]["assignedCallsUp"], serde_json::json!([3]));
        assert_eq!(json["cars"][1]["doorState"], "open");
        assert_eq!(json["cars"][1]["direction"], "stop");
        assert_eq!(json["cars"][1]["isMoving"], false);
        assert_eq!(json["cars"][1]["absolutePosition"], 1.0);
    }
}
