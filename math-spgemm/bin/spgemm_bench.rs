use clap::Parser;
use math_spgemm::config::DEFAULT_THREAD_COUNTS;
use math_spgemm::{BenchConfig, CsrMatrix, ParallelConfig, multiply, sort_rows};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "spgemm-bench",
    about = "Time block-parallel sparse matrix multiplication of two random CSR matrices"
)]
struct Cli {
    /// Rows of A
    a_rows: Option<usize>,

    /// Columns of A (and rows of B)
    a_cols: Option<usize>,

    /// Columns of B
    b_cols: Option<usize>,

    /// Fraction of non-zero cells in A and B (at most 0.5)
    fill_factor: Option<f64>,

    /// Run a single multiplication on this many threads
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Comma-separated thread counts to sweep (e.g. 1,2,4,8)
    #[arg(long, value_delimiter = ',')]
    threads_list: Option<Vec<usize>>,

    /// Random seed for A (B uses seed + 1)
    #[arg(long)]
    seed: Option<u64>,

    /// Rows of A per parallel block (defaults to 1% of the rows)
    #[arg(long)]
    block_size: Option<usize>,

    /// JSON benchmark configuration; positional arguments override its sizes
    #[arg(long)]
    config: Option<PathBuf>,
}

fn build_config(cli: &Cli) -> Result<BenchConfig, String> {
    let mut config = match &cli.config {
        Some(path) => BenchConfig::from_file(path)?,
        None => {
            let (Some(a_rows), Some(a_cols), Some(b_cols), Some(fill_factor)) =
                (cli.a_rows, cli.a_cols, cli.b_cols, cli.fill_factor)
            else {
                return Err(
                    "usage: spgemm-bench <a_rows> <a_cols> <b_cols> <fill_factor> [-t <threads>]"
                        .to_string(),
                );
            };

            let available = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            let mut thread_counts: Vec<usize> = DEFAULT_THREAD_COUNTS
                .iter()
                .copied()
                .filter(|&n| n <= available)
                .collect();
            if thread_counts.is_empty() {
                thread_counts.push(1);
            }

            BenchConfig {
                a_rows,
                a_cols,
                b_cols,
                fill_factor,
                seed: 0,
                block_size: None,
                thread_counts,
            }
        }
    };

    if let Some(a_rows) = cli.a_rows {
        config.a_rows = a_rows;
    }
    if let Some(a_cols) = cli.a_cols {
        config.a_cols = a_cols;
    }
    if let Some(b_cols) = cli.b_cols {
        config.b_cols = b_cols;
    }
    if let Some(fill_factor) = cli.fill_factor {
        config.fill_factor = fill_factor;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.block_size.is_some() {
        config.block_size = cli.block_size;
    }
    if let Some(list) = &cli.threads_list {
        config.thread_counts = list.clone();
    }
    if let Some(threads) = cli.threads {
        config.thread_counts = vec![threads];
    }

    Ok(config)
}

fn run(config: &BenchConfig) -> Result<(), Box<dyn Error>> {
    println!("A_nrows: {}", config.a_rows);
    println!("A_ncols: {}", config.a_cols);
    println!("B_ncols: {}", config.b_cols);
    println!("factor: {}", config.fill_factor);
    println!("seed: {}", config.seed);

    let a: CsrMatrix<f32> =
        CsrMatrix::random(config.a_rows, config.a_cols, &config.left_generator())?;
    // B is generated already transposed
    let mut bt: CsrMatrix<f32> =
        CsrMatrix::random(config.b_cols, config.a_cols, &config.right_generator())?;
    a.validate()?;
    bt.validate()?;
    println!("Built A and B");

    sort_rows(&mut bt, &ParallelConfig::default())?;

    println!(
        "Matrix: {}x{} * {}x{}, Factor: {}",
        config.a_rows, config.a_cols, config.a_cols, config.b_cols, config.fill_factor
    );

    let mut timings = Vec::with_capacity(config.thread_counts.len());
    let mut last = None;
    for &threads in &config.thread_counts {
        let multiply_config = config.multiply_config(threads);
        let start = Instant::now();
        let c = multiply(&a, &bt, &multiply_config)?;
        let micros = start.elapsed().as_secs_f64() * 1e6;

        println!("Thread: {:>3}, Time: {:>14.1} us", threads, micros);
        timings.push(micros);
        last = Some(c);
    }

    if timings.len() > 1 {
        let row = timings
            .iter()
            .map(|t| format!("{:>12.1}", t))
            .collect::<Vec<_>>()
            .join(",");
        println!();
        println!("Time(us): {}", row);
    }

    if let Some(c) = last {
        println!("{}", c.info("C"));
    }
    println!("{}", a.info("A"));
    println!("{}", bt.info("B"));

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
