use chrono::Local;
use databag::{BagError, DataBag};

type Stage = fn(&mut DataBag) -> Result<(), BagError>;

fn log(stage: &str, message: &str) {
    println!(
        "[{}] {:<8} {}",
        Local::now().format("%H:%M:%S%.3f"),
        stage,
        message
    );
}

// Builds a diagonal system sized by the "unknowns" entry.
fn assemble(bag: &mut DataBag) -> Result<(), BagError> {
    let n = *bag.get::<usize>("unknowns")?;
    bag.insert("diagonal", vec![2.0f64; n]);
    bag.insert("rhs", vec![1.0f64; n]);
    log("assemble", &format!("built a system of {} unknowns", n));
    Ok(())
}

// Solves the diagonal system left by the assembly stage.
fn solve(bag: &mut DataBag) -> Result<(), BagError> {
    let solution: Vec<f64> = {
        let diagonal = bag.get::<Vec<f64>>("diagonal")?;
        let rhs = bag.get::<Vec<f64>>("rhs")?;
        rhs.iter().zip(diagonal.iter()).map(|(b, a)| b / a).collect()
    };
    log("solve", &format!("solved for {} unknowns", solution.len()));
    bag.insert("solution", solution);
    Ok(())
}

// Reduces the solution to the number the caller actually wants.
fn publish(bag: &mut DataBag) -> Result<(), BagError> {
    let norm: f64 = bag
        .get::<Vec<f64>>("solution")?
        .iter()
        .map(|x| x * x)
        .sum::<f64>()
        .sqrt();
    bag.insert("norm", norm);
    log("publish", &format!("solution norm = {:.6}", norm));
    Ok(())
}

fn main() -> Result<(), BagError> {
    let mut bag = DataBag::new();
    bag.insert("unknowns", 8usize);

    // Stages share nothing but the bag; each finds what the one before left.
    let stages: [(&str, Stage); 3] = [("assemble", assemble), ("solve", solve), ("publish", publish)];

    log("driver", "pipeline starting");
    for (name, stage) in stages {
        if let Err(e) = stage(&mut bag) {
            log(name, &format!("failed: {}", e));
            return Err(e);
        }
    }
    log("driver", "pipeline finished");

    println!("final norm: {}", *bag.get::<f64>("norm")?);
    Ok(())
}
