use databag::{DataBag, Shared};

#[derive(Debug, Default)]
struct Accumulator {
    total: f64,
    samples: usize,
}

impl Accumulator {
    fn record(&mut self, value: f64) {
        self.total += value;
        self.samples += 1;
    }

    fn mean(&self) -> f64 {
        self.total / self.samples as f64
    }
}

#[test]
fn test_borrow_guards_read_and_write_one_value() {
    let acc = Shared::new(Accumulator::default());
    let alias = acc.clone();

    acc.borrow_mut().record(2.0);
    alias.borrow_mut().record(4.0);

    assert_eq!(acc.borrow().samples, 2);
    assert_eq!(alias.borrow().mean(), 3.0);
}

#[test]
fn test_get_hands_out_an_independent_copy() {
    let counter = Shared::new(10i32);
    let copy = counter.get();

    counter.set(11);
    assert_eq!(copy, 10);
    assert_eq!(counter.get(), 11);
}

#[test]
fn test_clones_agree_on_the_value_address() {
    let a = Shared::new(vec![1u8, 2]);
    let b = a.clone();
    let c = Shared::new(vec![1u8, 2]);

    assert_eq!(a.as_ptr(), b.as_ptr());
    assert_ne!(a.as_ptr(), c.as_ptr());
    assert!(Shared::ptr_eq(&a, &b));
    assert!(!Shared::ptr_eq(&a, &c));
}

#[test]
fn test_default_starts_from_the_type_default() {
    let level: Shared<u32> = Shared::default();
    assert_eq!(level.get(), 0);
}

#[test]
#[should_panic(expected = "already borrowed")]
fn test_set_while_read_borrowed_panics() {
    let value = Shared::new(1i32);

    let _reader = value.borrow();
    value.set(2);
}

#[test]
fn test_observers_follow_bag_membership() {
    let state = Shared::new(0.5f64);
    assert_eq!(state.observers(), 0);

    let mut coarse = DataBag::new();
    let mut fine = DataBag::new();
    coarse.insert_shared("relaxation", &state);
    fine.insert_shared("relaxation", &state);
    assert_eq!(state.observers(), 2);

    drop(coarse);
    assert_eq!(state.observers(), 1);

    // The remaining bag still aliases the value.
    *fine.get_mut::<f64>("relaxation").unwrap() = 0.25;
    assert_eq!(state.get(), 0.25);
}

#[test]
fn test_handles_survive_the_bag_they_were_lent_to() {
    let log = Shared::new(vec![String::from("start")]);
    {
        let mut bag = DataBag::new();
        bag.insert_shared("log", &log);
        bag.get_mut::<Vec<String>>("log")
            .unwrap()
            .push(String::from("step"));
    }

    assert_eq!(log.borrow().len(), 2);
    assert_eq!(log.observers(), 0);
}
