use databag::{BagError, DataBag, Shared};

// An iterative solver that only knows the bag: it halves the residual and
// advances the step counter through named entries, unaware of who else is
// watching those numbers.
fn solve(bag: &mut DataBag) -> Result<(), BagError> {
    for _ in 0..8 {
        *bag.get_mut::<f64>("residual")? *= 0.5;
        *bag.get_mut::<u32>("step")? += 1;
    }
    Ok(())
}

fn main() -> Result<(), BagError> {
    // The driver owns the numbers; the bag and the watchdog only alias them.
    let residual = Shared::new(1.0f64);
    let step = Shared::new(0u32);
    let watchdog = residual.clone();

    let mut bag = DataBag::new();
    bag.insert_shared("residual", &residual);
    bag.insert_shared("step", &step);
    println!("observers of the residual: {}", residual.observers());

    solve(&mut bag)?;

    // Every party sees the same numbers.
    println!("driver sees   step {} residual {:e}", step.get(), residual.get());
    println!("watchdog sees                 {:e}", watchdog.get());
    println!("bag sees                      {:e}", *bag.get::<f64>("residual")?);

    drop(bag);

    // The values outlive the bag they were lent to.
    println!(
        "after the bag is gone: residual = {:e}, observers = {}",
        residual.get(),
        residual.observers()
    );

    Ok(())
}
