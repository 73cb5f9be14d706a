use crate::shared::{Direction, FloorSet, BOTTOM_FLOOR, TOP_FLOOR};

/**
 * Building-wide lit state of the hall call buttons.
 *
 * Up buttons exist on floors 1-5 and down buttons on floors 2-6. The registry
 * mirrors the union of the cars' assigned-call sets: a button is lit from the
 * moment the call is dispatched until the owning car services it.
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallRegistry {
    call_buttons_up: FloorSet,
    call_buttons_down: FloorSet,
}

impl CallRegistry {
    pub fn new() -> CallRegistry {
        CallRegistry::default()
    }

    /// Whether the building has a hall button at `floor` for `direction`.
    pub fn has_button(floor: u8, direction: Direction) -> bool {
        match direction {
            Direction::Up => (BOTTOM_FLOOR..TOP_FLOOR).contains(&floor),
            Direction::Down => (BOTTOM_FLOOR + 1..=TOP_FLOOR).contains(&floor),
            Direction::Stop => false,
        }
    }

    pub fn is_lit(&self, floor: u8, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.call_buttons_up.contains(floor),
            Direction::Down => self.call_buttons_down.contains(floor),
            Direction::Stop => false,
        }
    }

    pub fn light(&mut self, floor: u8, direction: Direction) {
        if !Self::has_button(floor, direction) {
            return;
        }
        match direction {
            Direction::Up => self.call_buttons_up.insert(floor),
            Direction::Down => self.call_buttons_down.insert(floor),
            Direction::Stop => false,
        };
    }

    pub fn clear(&mut self, floor: u8, direction: Direction) {
        match direction {
            Direction::Up => self.call_buttons_up.remove(floor),
            Direction::Down => self.call_buttons_down.remove(floor),
            Direction::Stop => false,
        };
    }

    pub fn call_buttons_up(&self) -> FloorSet {
        self.call_buttons_up
    }

    pub fn call_buttons_down(&self) -> FloorSet {
        self.call_buttons_down
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
