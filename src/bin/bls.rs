use anyhow::{Context, Result};
use bls_rs::config::Settings;
use bls_rs::inflation::CpiTable;
use bls_rs::{Client, StateFips, YearRange};
use bls_rs::{fips, series, stats, storage, tidy};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bls",
    version,
    about = "Fetch, reshape & inflation-adjust BLS state time series"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print (or save) the state FIPS table.
    Fips(FipsArgs),
    /// Show the series ids built from the FIPS table, split into two request batches.
    SeriesIds(SeriesArgs),
    /// Fetch series for every state and save them in tidy form.
    Get(GetArgs),
    /// Print the ratio rebasing a year's dollars to 2018.
    Inflation(InflationArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct FipsArgs {
    /// Save the table as CSV instead of printing it.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    /// Text before the two-digit state code (e.g., LASST).
    #[arg(long)]
    prefix: String,
    /// Text after the state code (e.g., 0000000000003).
    #[arg(long)]
    suffix: String,
    /// Restrict to these FIPS codes, separated by comma or semicolon (e.g., 6,36).
    #[arg(long)]
    fips: Option<String>,
}

#[derive(Args, Debug)]
struct GetArgs {
    #[command(flatten)]
    series: SeriesArgs,
    /// Year (YYYY) or range (YYYY:YYYY)
    #[arg(short, long)]
    years: String,
    /// BLS registration key.
    #[arg(long, env = "BLS_API_KEY", hide_env_values = true)]
    key: Option<String>,
    /// Save tidy results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json) for --out. If omitted, inferred from the extension.
    #[arg(long, value_enum, requires = "out")]
    format: Option<OutFormat>,
    /// Also save the wide table (one column per state) as CSV.
    #[arg(long)]
    wide: Option<PathBuf>,
    /// Name of the value column in tidy output.
    #[arg(long, default_value = tidy::DEFAULT_VALUE_NAME)]
    value_name: String,
    /// Print per-state statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct InflationArgs {
    /// Year whose dollars should be rebased.
    #[arg(long)]
    year: i32,
    /// CPI table (columns Year, CPI-U-RS Index). Defaults to cpi_index.csv.
    #[arg(long)]
    cpi: Option<PathBuf>,
    /// Also print this amount converted to 2018 dollars.
    #[arg(long)]
    amount: Option<f64>,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_codes(s: &str) -> Result<Vec<u8>> {
    s.split([',', ';'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<u8>()
                .with_context(|| format!("invalid FIPS code {:?}", x))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let settings = Settings::from_env();
    match cli.cmd {
        Command::Fips(args) => cmd_fips(&settings, args),
        Command::SeriesIds(args) => cmd_series_ids(&settings, args),
        Command::Get(args) => cmd_get(&settings, args),
        Command::Inflation(args) => cmd_inflation(&settings, args),
    }
}

fn load_states(client: &Client, codes: Option<&str>) -> Result<Vec<StateFips>> {
    let table = client
        .fetch_state_fips()
        .with_context(|| format!("loading FIPS table from {}", client.fips_url))?;
    match codes {
        Some(c) => Ok(fips::select(&table, &parse_codes(c)?)?),
        None => Ok(table),
    }
}

fn cmd_fips(settings: &Settings, args: FipsArgs) -> Result<()> {
    let client = Client::new(settings)?;
    let states = load_states(&client, None)?;
    match args.out {
        Some(path) => {
            storage::save_fips_csv(&states, &path)?;
            eprintln!("Saved {} rows to {}", states.len(), path.display());
        }
        None => storage::write_fips_csv(&states, std::io::stdout().lock())?,
    }
    Ok(())
}

fn cmd_series_ids(settings: &Settings, args: SeriesArgs) -> Result<()> {
    let client = Client::new(settings)?;
    let states = load_states(&client, args.fips.as_deref())?;
    let (first, second) = series::build_series_halves(&states, &args.prefix, &args.suffix);
    for (n, half) in [first, second].iter().enumerate() {
        println!("# batch {} ({} series)", n + 1, half.len());
        for (id, state) in half.iter() {
            println!("{}\t{}", id, state);
        }
    }
    Ok(())
}

fn cmd_get(settings: &Settings, args: GetArgs) -> Result<()> {
    let years = YearRange::parse(&args.years)?;
    let client = Client::new(settings)?.with_api_key(args.key.clone());
    let states = load_states(&client, args.series.fips.as_deref())?;
    let map = series::build_series_map(&states, &args.series.prefix, &args.series.suffix);

    let wide = client
        .fetch_all(&map, years)
        .with_context(|| format!("fetching {} series for {}-{}", map.len(), years.start, years.end))?;
    let long = tidy::melt_as(&wide, &args.value_name);

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_tidy_csv(&long, path)?,
            "json" => storage::save_tidy_json(&long, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", long.records.len(), path.display());
    }

    if let Some(path) = args.wide.as_ref() {
        storage::save_wide_csv(&wide, path)?;
        eprintln!(
            "Saved {} x {} wide table to {}",
            wide.n_rows(),
            wide.n_cols(),
            path.display()
        );
    }

    if args.out.is_none() && args.wide.is_none() && !args.stats {
        storage::write_tidy_csv(&long, std::io::stdout().lock())?;
    }

    if args.stats {
        for s in stats::state_summary(&long) {
            let latest = s
                .latest
                .map(|(d, v)| format!("{} ({})", fmt_opt(Some(v)), d))
                .unwrap_or_else(|| "NA".into());
            println!(
                "{}  count={} missing={}  min={} max={} mean={} median={} latest={}",
                s.state,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median),
                latest
            );
        }
    }

    Ok(())
}

fn cmd_inflation(settings: &Settings, args: InflationArgs) -> Result<()> {
    let path = args.cpi.unwrap_or_else(|| settings.cpi_path.clone());
    let table =
        CpiTable::load(&path).with_context(|| format!("reading CPI table {}", path.display()))?;
    let ratio = table.ratio(args.year)?;
    println!("{}", ratio);
    if let Some(amount) = args.amount {
        println!(
            "{} ({} dollars) = {} (2018 dollars)",
            fmt_opt(Some(amount)),
            args.year,
            fmt_opt(Some(amount * ratio))
        );
    }
    Ok(())
}
