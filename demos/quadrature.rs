use databag::{BagError, DataBag, Shared};

// Five-point Gauss-Legendre rule on [-1, 1], exact through degree nine.
const NODES: [f64; 5] = [
    0.0,
    -0.5384693101056831,
    0.5384693101056831,
    -0.9061798459386640,
    0.9061798459386640,
];
const WEIGHTS: [f64; 5] = [
    0.5688888888888889,
    0.4786286704993665,
    0.4786286704993665,
    0.2369268850561891,
    0.2369268850561891,
];

fn integrand(x: f64) -> f64 {
    x.powi(4)
}

// Stage 1: deposit the quadrature rule for everyone downstream.
fn prepare_rule(bag: &mut DataBag) {
    bag.insert("nodes", NODES.to_vec());
    bag.insert("weights", WEIGHTS.to_vec());
}

// Stage 2: evaluate the integrand at every node, counting evaluations in
// the driver's shared tally.
fn sample(bag: &mut DataBag) -> Result<(), BagError> {
    let samples: Vec<f64> = bag
        .get::<Vec<f64>>("nodes")?
        .iter()
        .map(|&x| integrand(x))
        .collect();
    *bag.get_mut::<u32>("evaluations")? += samples.len() as u32;
    bag.insert("samples", samples);
    Ok(())
}

// Stage 3: combine weights and samples into the integral.
fn integrate(bag: &DataBag) -> Result<f64, BagError> {
    let weights = bag.get::<Vec<f64>>("weights")?;
    let samples = bag.get::<Vec<f64>>("samples")?;
    Ok(weights.iter().zip(samples.iter()).map(|(w, s)| w * s).sum())
}

fn main() -> Result<(), BagError> {
    let mut bag = DataBag::new();

    // The driver keeps the evaluation counter and lends it to the stages.
    let evaluations = Shared::new(0u32);
    bag.insert_shared("evaluations", &evaluations);

    prepare_rule(&mut bag);
    sample(&mut bag)?;
    let integral = integrate(&bag)?;

    println!("integral of x^4 over [-1, 1] = {:.12}", integral);
    println!("exact value                  = {:.12}", 0.4);
    println!("function evaluations         = {}", evaluations.get());

    // Asking with the wrong type is reported, not papered over.
    match bag.get::<Vec<f32>>("weights") {
        Ok(_) => println!("unexpected: weights came back as f32"),
        Err(e) => println!("wrong-type lookup rejected: {}", e),
    }

    Ok(())
}
