use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use tripledger::config::{
    config_dir, list_trips, load_config, load_trip, save_trip, trips_dir, Config, Passenger,
    TripFile, CONFIG_TEMPLATE, EXAMPLE_TRIP_TEMPLATE,
};
use tripledger::error::{Result, TripError};
use tripledger::ledger::{
    urgency_buckets, PassengerLedger, PaymentEvent, PaymentStream, PendencyCategory,
    PendencyQuery, SortOrder, UrgencyTier,
};
use tripledger::trip::{
    enroll, evaluate, normalize, record_payment, EnrollmentRequest, StreamSummary, TripEvaluation,
    TripSchema,
};

#[derive(Parser)]
#[command(name = "tripledger")]
#[command(version, about = "Group-travel ledger: passenger pendencies and trip finances", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.tripledger or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show configuration and trip count
    Status,

    /// List trips with their revenue and pending totals
    Trips,

    /// List passenger ledgers for a trip
    Passengers {
        /// Trip identifier (file name under trips/)
        trip: String,

        /// Pending category: all, trip-only, add-ons-only, both
        #[arg(long, default_value = "all")]
        category: String,

        /// Case-insensitive search over name and phone
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order: name, owed, pending
        #[arg(long, default_value = "name")]
        sort: String,

        /// Number of passengers to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print ledgers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one passenger's ledger and payment history
    Ledger {
        /// Trip identifier
        trip: String,

        /// Passenger id or index from 'passengers' (e.g., 1 or ana)
        passenger: String,
    },

    /// Group passengers who still owe money by urgency
    Pendencies {
        /// Trip identifier
        trip: String,
    },

    /// Show the trip's financial summary
    Summary {
        /// Trip identifier
        trip: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a payment from a passenger
    Pay {
        /// Trip identifier
        trip: String,

        /// Passenger id or index from 'passengers'
        passenger: String,

        /// Payment amount
        amount: f64,

        /// Debt the payment covers: fare, addons, both
        #[arg(long, default_value = "fare")]
        stream: String,

        /// Payment date (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Payment method (e.g., pix, cash, card)
        #[arg(long)]
        method: Option<String>,
    },

    /// Enroll passengers on a trip, optionally with add-ons
    Enroll {
        /// Trip identifier
        trip: String,

        /// Passenger in format "id:name" or "id:name:phone" (can be repeated)
        #[arg(short, long, value_name = "ID:NAME[:PHONE]")]
        passenger: Vec<String>,

        /// Base fare for every enrolled passenger
        #[arg(long, default_value_t = 0.0)]
        fare: f64,

        /// Discount on the base fare
        #[arg(long, default_value_t = 0.0)]
        discount: f64,

        /// Exempt the passengers from every charge
        #[arg(long)]
        complimentary: bool,

        /// Add-on id to link to every enrolled passenger (can be repeated)
        #[arg(short, long = "add-on", value_name = "ADD_ON")]
        add_on: Vec<String>,
    },
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tripledger=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Trips => cmd_trips(&cfg_dir),
        Commands::Passengers {
            trip,
            category,
            search,
            sort,
            limit,
            json,
        } => cmd_passengers(&cfg_dir, &trip, &category, search, &sort, limit, json),
        Commands::Ledger { trip, passenger } => cmd_ledger(&cfg_dir, &trip, &passenger),
        Commands::Pendencies { trip } => cmd_pendencies(&cfg_dir, &trip),
        Commands::Summary { trip, json } => cmd_summary(&cfg_dir, &trip, json),
        Commands::Pay {
            trip,
            passenger,
            amount,
            stream,
            date,
            method,
        } => cmd_pay(&cfg_dir, &trip, &passenger, amount, &stream, date, method),
        Commands::Enroll {
            trip,
            passenger,
            fare,
            discount,
            complimentary,
            add_on,
        } => cmd_enroll(
            &cfg_dir,
            &trip,
            &passenger,
            fare,
            discount,
            complimentary,
            &add_on,
        ),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(TripError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir.join("trips"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(
        cfg_dir.join("trips").join("example-trip.toml"),
        EXAMPLE_TRIP_TEMPLATE,
    )?;

    println!("Initialized tripledger config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your agency details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Describe a trip:           $EDITOR {}/trips/<trip-id>.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then look at who still owes what:");
    println!("  tripledger passengers example-trip");

    Ok(())
}

/// Loaded config plus the directory trips live in
struct Workspace {
    config: Config,
    trips_dir: PathBuf,
}

fn open_workspace(cfg_dir: &Path) -> Result<Workspace> {
    if !cfg_dir.exists() {
        return Err(TripError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let config = load_config(cfg_dir)?;
    let trips_dir = trips_dir(&config, cfg_dir);
    Ok(Workspace { config, trips_dir })
}

impl Workspace {
    fn symbol(&self) -> &str {
        &self.config.ledger.currency_symbol
    }

    fn money(&self, value: f64) -> String {
        format_money(value, self.symbol())
    }

    fn load(&self, trip_id: &str) -> Result<TripFile> {
        load_trip(&self.trips_dir, trip_id)
    }

    fn evaluate(&self, trip: &TripFile) -> TripEvaluation {
        evaluate(trip, &self.config.urgency)
    }
}

// Table row structs for tabled
#[derive(Tabled)]
struct TripRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DEPARTURE")]
    departure: String,
    #[tabled(rename = "PASSENGERS")]
    passengers: usize,
    #[tabled(rename = "REVENUE")]
    revenue: String,
    #[tabled(rename = "PENDING")]
    pending: String,
}

#[derive(Tabled)]
struct LedgerRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "OWED")]
    owed: String,
    #[tabled(rename = "PENDING")]
    pending: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "URGENCY")]
    urgency: String,
}

#[derive(Tabled)]
struct StreamRow {
    #[tabled(rename = "STREAM")]
    stream: &'static str,
    #[tabled(rename = "OWED")]
    owed: String,
    #[tabled(rename = "PAID")]
    paid: String,
    #[tabled(rename = "PENDING")]
    pending: String,
}

#[derive(Tabled)]
struct AddOnRow {
    #[tabled(rename = "ADD-ON")]
    name: String,
    #[tabled(rename = "CHARGED")]
    charged: String,
}

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STREAM")]
    stream: String,
    #[tabled(rename = "METHOD")]
    method: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct PendencyRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "PENDING")]
    pending: String,
    #[tabled(rename = "DAYS OVERDUE")]
    days_overdue: i64,
}

#[derive(Tabled)]
struct SummaryStreamRow {
    #[tabled(rename = "STREAM")]
    stream: &'static str,
    #[tabled(rename = "REVENUE")]
    revenue: String,
    #[tabled(rename = "COLLECTED")]
    collected: String,
    #[tabled(rename = "PENDING")]
    pending: String,
    #[tabled(rename = "EXPENSES")]
    expenses: String,
    #[tabled(rename = "PROFIT")]
    profit: String,
    #[tabled(rename = "MARGIN")]
    margin: String,
}

fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Format a money amount with two decimal places and thousands separators
fn format_money(value: f64, currency_symbol: &str) -> String {
    let rounded = format!("{:.2}", value);
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let negative = whole.starts_with('-');
    let digits = whole.trim_start_matches('-');
    let grouped = format_grouped_int(digits.parse::<i64>().unwrap_or(0));

    if negative {
        format!("-{}{}.{}", currency_symbol, grouped, frac)
    } else {
        format!("{}{}.{}", currency_symbol, grouped, frac)
    }
}

fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Append summary rows under a rounded table.
///
/// The first `label_columns` columns merge into one label cell, the next
/// column carries the value, and any columns after it are closed off.
fn add_financial_footer(table: &str, label_columns: usize, rows: &[(&str, String)]) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 || rows.is_empty() || label_columns == 0 {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let top = lines[0];
    let Some(inner) = top.strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() <= label_columns {
        return table.to_string();
    }

    let left_width = widths[..label_columns].iter().sum::<usize>() + label_columns - 1;
    let value_width = widths[label_columns];
    let trailing = &widths[label_columns + 1..];

    let dashes = |ws: &[usize]| {
        ws.iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("┴")
    };

    // Strip the original bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    out.push_str(&format!(
        "├{}┼{}",
        dashes(&widths[..label_columns]),
        "─".repeat(value_width)
    ));
    if trailing.is_empty() {
        out.push_str("┤\n");
    } else {
        out.push_str(&format!("┼{}╯\n", dashes(trailing)));
    }

    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>left$} │ {:>value$} │\n",
            label,
            value,
            left = left_width - 2,
            value = value_width - 2
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                "─".repeat(left_width),
                "─".repeat(value_width)
            ));
        }
    }

    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(left_width),
        "─".repeat(value_width)
    ));

    out
}

/// Show configuration and trip count
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    let trips = list_trips(&ws.trips_dir)?;

    println!("Tripledger Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Trips directory:  {}", ws.trips_dir.display());
    println!("Agency:           {}", ws.config.agency.name);
    println!("Currency:         {}", ws.symbol());
    println!(
        "Urgency:          critical after {} days, attention from {} days",
        ws.config.urgency.critical_after_days, ws.config.urgency.attention_from_days
    );
    println!("Trips:            {}", trips.len());

    Ok(())
}

/// List trips with revenue and pending totals
fn cmd_trips(cfg_dir: &Path) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    let ids = list_trips(&ws.trips_dir)?;

    if ids.is_empty() {
        println!("No trips found.");
        println!("Add trips to: {}", ws.trips_dir.display());
        return Ok(());
    }

    let mut rows = Vec::with_capacity(ids.len());
    for id in ids {
        let trip = ws.load(&id)?;
        let evaluation = ws.evaluate(&trip);
        rows.push(TripRow {
            id,
            name: trip.trip.name.clone(),
            departure: trip
                .trip
                .departure
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            passengers: evaluation.summary.passengers,
            revenue: ws.money(evaluation.summary.total_revenue),
            pending: ws.money(evaluation.summary.total_pending),
        });
    }

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List passenger ledgers with filters and a financial footer
fn cmd_passengers(
    cfg_dir: &Path,
    trip_id: &str,
    category: &str,
    search: Option<String>,
    sort: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    let query = PendencyQuery {
        category: category.parse::<PendencyCategory>()?,
        search,
        sort: sort.parse::<SortOrder>()?,
    };

    let trip = ws.load(trip_id)?;
    let evaluation = ws.evaluate(&trip);

    let selected = query.apply(&evaluation.ledgers);
    let selected = match limit {
        Some(n) => &selected[..n.min(selected.len())],
        None => &selected[..],
    };

    if json {
        println!("{}", serde_json::to_string_pretty(selected)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("No passengers match.");
        return Ok(());
    }

    let rows: Vec<LedgerRow> = selected
        .iter()
        .map(|ledger| LedgerRow {
            index: roster_index(&evaluation, &ledger.passenger_id),
            id: ledger.passenger_id.clone(),
            name: ledger.name.clone(),
            owed: ws.money(ledger.total_owed()),
            pending: ws.money(ledger.pending_total),
            status: ledger.status.to_string(),
            urgency: ledger.urgency.to_string(),
        })
        .collect();

    let shown_owed: f64 = selected.iter().map(|l| l.total_owed()).sum();
    let shown_pending: f64 = selected.iter().map(|l| l.pending_total).sum();
    let shown_collected: f64 = selected.iter().map(|l| l.collected()).sum();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let table = add_financial_footer(
        &table,
        3,
        &[
            ("TOTAL", ws.money(shown_owed)),
            ("(-) COLLECTED", ws.money(shown_collected)),
            ("(=) PENDING", ws.money(shown_pending)),
        ],
    );
    println!("{table}");

    println!();
    println!(
        "Showing {} of {} passengers",
        selected.len(),
        evaluation.ledgers.len()
    );

    Ok(())
}

/// 1-based position of a passenger in the trip roster
fn roster_index(evaluation: &TripEvaluation, passenger_id: &str) -> usize {
    evaluation
        .ledgers
        .iter()
        .position(|l| l.passenger_id == passenger_id)
        .map_or(0, |i| i + 1)
}

/// Resolve a passenger reference to the passenger id.
/// Accepts either the passenger id or the 1-based `#` shown by 'passengers',
/// which counts the roster after duplicate ids are dropped.
fn resolve_passenger(evaluation: &TripEvaluation, reference: &str) -> Result<String> {
    if evaluation.ledger(reference).is_some() {
        return Ok(reference.to_string());
    }

    if let Ok(idx) = reference.parse::<usize>() {
        if idx == 0 || idx > evaluation.ledgers.len() {
            return Err(TripError::InvalidPassengerIndex(reference.to_string()));
        }
        return Ok(evaluation.ledgers[idx - 1].passenger_id.clone());
    }

    Err(TripError::PassengerNotFound(reference.to_string()))
}

/// Show one passenger's ledger
fn cmd_ledger(cfg_dir: &Path, trip_id: &str, reference: &str) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    let trip = ws.load(trip_id)?;
    let evaluation = ws.evaluate(&trip);
    let passenger_id = resolve_passenger(&evaluation, reference)?;

    let ledger = evaluation
        .ledger(&passenger_id)
        .ok_or_else(|| TripError::PassengerNotFound(passenger_id.clone()))?;

    println!("{} ({})", ledger.name, ledger.passenger_id);
    if let Some(phone) = &ledger.phone {
        println!("Phone:    {phone}");
    }
    if ledger.complimentary {
        println!("Status:   {} (complimentary)", ledger.status);
    } else {
        println!(
            "Status:   {}  Urgency: {} ({} days overdue)",
            ledger.status, ledger.urgency, ledger.days_overdue
        );
    }
    println!();

    let streams = vec![
        StreamRow {
            stream: "Trip fare",
            owed: ws.money(ledger.fare_owed),
            paid: ws.money(ledger.paid_fare),
            pending: ws.money(ledger.pending_fare),
        },
        StreamRow {
            stream: "Add-ons",
            owed: ws.money(ledger.add_on_owed),
            paid: ws.money(ledger.paid_add_ons),
            pending: ws.money(ledger.pending_add_ons),
        },
        StreamRow {
            stream: "Total",
            owed: ws.money(ledger.total_owed()),
            paid: ws.money(ledger.paid_fare + ledger.paid_add_ons),
            pending: ws.money(ledger.pending_total),
        },
    ];
    println!("{}", Table::new(streams).with(Style::rounded()));

    let normalized = normalize(&trip);
    let selections: Vec<AddOnRow> = normalized
        .passengers
        .iter()
        .filter(|p| p.passenger.id == passenger_id)
        .flat_map(|p| p.selections.iter())
        .map(|s| AddOnRow {
            name: s.name.clone(),
            charged: ws.money(s.charged),
        })
        .collect();
    if !selections.is_empty() {
        println!();
        println!("Add-ons");
        println!("{}", Table::new(selections).with(Style::rounded()));
    }

    println!();
    println!("Payments");
    let payments: Vec<PaymentRow> = trip
        .payments_for(&passenger_id)
        .enumerate()
        .map(|(idx, p)| PaymentRow {
            index: idx + 1,
            date: p
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            stream: p.stream.to_string(),
            method: p.method.clone().unwrap_or_else(|| "-".to_string()),
            amount: ws.money(p.amount),
        })
        .collect();
    if payments.is_empty() {
        println!("  No payments recorded.");
    } else {
        println!("{}", Table::new(payments).with(Style::rounded()));
    }

    Ok(())
}

/// Group outstanding passengers by urgency
fn cmd_pendencies(cfg_dir: &Path, trip_id: &str) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    let trip = ws.load(trip_id)?;
    let evaluation = ws.evaluate(&trip);
    let buckets = urgency_buckets(&evaluation.ledgers);

    if buckets.is_empty() {
        println!("Nobody owes anything on {}.", trip.trip.name);
        return Ok(());
    }

    for tier in [
        UrgencyTier::Critical,
        UrgencyTier::Attention,
        UrgencyTier::OnTrack,
    ] {
        let ledgers = buckets.tier(tier);
        if ledgers.is_empty() {
            continue;
        }
        let pending: f64 = ledgers.iter().map(|l| l.pending_total).sum();
        println!("{} ({}) - {}", tier, ledgers.len(), ws.money(pending));
        let rows: Vec<PendencyRow> = ledgers
            .iter()
            .map(|l| pendency_row(l, &ws))
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!();
    }

    println!("Passengers with pending payments: {}", buckets.len());

    Ok(())
}

fn pendency_row(ledger: &PassengerLedger, ws: &Workspace) -> PendencyRow {
    PendencyRow {
        name: ledger.name.clone(),
        phone: ledger.phone.clone().unwrap_or_else(|| "-".to_string()),
        pending: ws.money(ledger.pending_total),
        days_overdue: ledger.days_overdue,
    }
}

fn summary_stream_row(stream: &'static str, s: &StreamSummary, ws: &Workspace) -> SummaryStreamRow {
    SummaryStreamRow {
        stream,
        revenue: ws.money(s.revenue),
        collected: ws.money(s.collected),
        pending: ws.money(s.pending),
        expenses: ws.money(s.expenses),
        profit: ws.money(s.profit),
        margin: format_percent(s.margin_pct),
    }
}

/// Show the trip's financial summary
fn cmd_summary(cfg_dir: &Path, trip_id: &str, json: bool) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    let trip = ws.load(trip_id)?;
    let evaluation = ws.evaluate(&trip);
    let summary = &evaluation.summary;

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("{}", trip.trip.name);
    println!("{}", "-".repeat(50));
    println!(
        "Passengers:       {} ({} pending, {} partial, {} paid, {} complimentary)",
        summary.passengers,
        summary.status_counts.pending,
        summary.status_counts.partial,
        summary.status_counts.paid,
        summary.complimentary_passengers
    );
    println!("Still owing:      {}", summary.passengers_with_pending);
    println!("Revenue:          {}", ws.money(summary.total_revenue));
    println!(
        "Collected:        {} ({})",
        ws.money(summary.total_collected),
        format_percent(summary.collection_rate_pct)
    );
    println!("Pending:          {}", ws.money(summary.total_pending));
    println!(
        "Expenses:         {} ({} manual + {} add-on costs)",
        ws.money(summary.total_expenses),
        ws.money(summary.manual_expenses),
        ws.money(summary.add_on_costs)
    );
    println!(
        "Gross profit:     {} ({})",
        ws.money(summary.gross_profit),
        format_percent(summary.margin_pct)
    );

    if summary.schema == TripSchema::Split {
        println!();
        let rows = vec![
            summary_stream_row("Trip fare", &summary.fare, &ws),
            summary_stream_row("Add-ons", &summary.add_ons, &ws),
        ];
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    if !evaluation.warnings.is_empty() {
        println!();
        println!("Data warnings:");
        for warning in &evaluation.warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}

fn parse_date(value: Option<String>) -> Result<chrono::NaiveDate> {
    match value {
        Some(s) => chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| TripError::InvalidDate(s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Record a payment from a passenger
fn cmd_pay(
    cfg_dir: &Path,
    trip_id: &str,
    reference: &str,
    amount: f64,
    stream: &str,
    date: Option<String>,
    method: Option<String>,
) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    let stream = stream.parse::<PaymentStream>()?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TripError::InvalidPaymentAmount);
    }

    let mut trip = ws.load(trip_id)?;
    let passenger_id = resolve_passenger(&ws.evaluate(&trip), reference)?;
    let date = parse_date(date)?;

    let mut event = PaymentEvent::new(passenger_id.clone(), amount, stream).on(date);
    if let Some(method) = method {
        event = event.via(method);
    }
    record_payment(&mut trip, event)?;
    save_trip(&ws.trips_dir, trip_id, &trip)?;

    let evaluation = ws.evaluate(&trip);
    let ledger = evaluation
        .ledger(&passenger_id)
        .ok_or_else(|| TripError::PassengerNotFound(passenger_id.clone()))?;

    if ledger.is_outstanding() {
        println!(
            "Recorded {} {} payment for {} ({} remaining)",
            ws.money(amount),
            stream,
            ledger.name,
            ws.money(ledger.pending_total)
        );
    } else {
        println!(
            "Recorded {} {} payment for {} (fully paid)",
            ws.money(amount),
            stream,
            ledger.name
        );
    }

    Ok(())
}

/// Parse "id:name" or "id:name:phone"
fn parse_passenger_input(input: &str) -> Result<(String, String, Option<String>)> {
    let mut parts = input.splitn(3, ':');
    let id = parts.next().unwrap_or_default().trim();
    let name = parts.next().unwrap_or_default().trim();
    let phone = parts
        .next()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    if id.is_empty() || name.is_empty() {
        return Err(TripError::InvalidPassengerFormat(input.to_string()));
    }
    Ok((id.to_string(), name.to_string(), phone))
}

/// Enroll passengers on a trip
fn cmd_enroll(
    cfg_dir: &Path,
    trip_id: &str,
    passengers: &[String],
    fare: f64,
    discount: f64,
    complimentary: bool,
    add_ons: &[String],
) -> Result<()> {
    let ws = open_workspace(cfg_dir)?;
    if passengers.is_empty() {
        return Err(TripError::NoPassengers);
    }

    let mut requests = Vec::with_capacity(passengers.len());
    for input in passengers {
        let (id, name, phone) = parse_passenger_input(input)?;
        requests.push(EnrollmentRequest {
            passenger: Passenger {
                id,
                name,
                phone,
                fare,
                discount,
                complimentary,
                days_overdue: None,
            },
            add_ons: add_ons.to_vec(),
        });
    }

    let mut trip = ws.load(trip_id)?;
    let outcome = enroll(&mut trip, requests);

    if outcome.enrolled.is_empty() {
        let reasons: Vec<String> = outcome.rejected.iter().map(|r| r.to_string()).collect();
        return Err(TripError::EnrollmentFailed(reasons.join("; ")));
    }

    save_trip(&ws.trips_dir, trip_id, &trip)?;

    println!(
        "Enrolled {} passenger(s) on {} ({} add-on link(s))",
        outcome.enrolled.len(),
        trip.trip.name,
        outcome.linked
    );
    if !outcome.is_complete() {
        println!("Completed with warnings:");
        for rejected in &outcome.rejected {
            println!("  - not enrolled: {rejected}");
        }
        for failed in &outcome.failed_links {
            println!("  - add-on not linked: {failed}");
        }
    }

    Ok(())
}
