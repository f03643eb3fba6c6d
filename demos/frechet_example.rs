use frechet::prelude::*;
use ndarray::{arr1, arr2};

fn main() -> Result<()> {
    println!("=== Fréchet Distance Example ===\n");

    let x = Gaussian::new(arr1(&[0.0, 0.0]), arr2(&[[4.0, 1.0], [1.0, 3.0]]))?;
    let y = Gaussian::new(arr1(&[1.0, -0.5]), arr2(&[[5.0, 0.5], [0.5, 4.0]]))?;

    println!("Gaussian X: mean {}, covariance", x.mean());
    println!("{}\n", x.covariance());
    println!("Gaussian Y: mean {}, covariance", y.mean());
    println!("{}\n", y.covariance());

    let calc = FrechetDistance::new();

    let raw = calc.raw_distance_squared(&x, &y)?;
    println!("Raw d² (complex): {:.12} + {:.3e}i", raw.re, raw.im);

    let d = calc.distance(&x, &y)?;
    println!("Fréchet distance d(X, Y) = {:.6}", d);

    let d_db = FrechetDistance::new()
        .with_sqrt(DenmanBeavers::new())
        .distance(&x, &y)?;
    println!("Denman-Beavers square root gives {:.6}", d_db);

    let self_distance = calc.distance(&x, &x)?;
    println!("d(X, X) = {:.2e}", self_distance);

    println!("\n=== Dimension mismatch ===\n");
    let z = Gaussian::standard(3)?;
    match calc.distance(&x, &z) {
        Ok(d) => println!("unexpected distance {}", d),
        Err(err) => println!("✓ Rejected: {}", err),
    }

    Ok(())
}
