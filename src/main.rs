use budget_planner::config::{Config, default_config_path};
use budget_planner::engine::{month_name, scale_to_max};
use budget_planner::models::report::{CategoryBreakdown, HomeSummary, MonthlyDetail, YearlySeries};
use budget_planner::operations::add::{add_transaction_to_db, parse_period};
use budget_planner::operations::remove::remove_transaction_from_db;
use budget_planner::operations::report;
use budget_planner::operations::update::{current_transaction_details, update_transaction_in_db};
use budget_planner::{Category, TransactionStore};
use chrono::{Datelike, Local};
use clap::Parser;
use env_logger::Env;
use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Track income and expenses and see monthly and yearly summaries"
)]
struct Cli {
    /// Database file path, overrides the config file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

pub enum UserCommands {
    Add,
    Update,
    Remove,
    Month,
    Summary,
    Yearly,
    Categories,
    Help,
    Exit,
    Unknown,
}

struct Output {
    json: bool,
    currency: String,
    chart_width: usize,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = match Config::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let database = cli.db.clone().unwrap_or_else(|| config.database_path());
    let store = TransactionStore::open(database);
    let out = Output {
        json: cli.json,
        currency: config.currency_symbol.clone(),
        chart_width: config.chart_width,
    };

    println!("Welcome to the budget planner!");

    loop {
        println!(
            "Please enter a command \
             (add, update, remove, month, summary, yearly, categories, help, exit):"
        );

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match check_for_command(parts[0]) {
            UserCommands::Add => {
                println!(
                    "Enter transaction details in the format:\n\
                     YYYY-MM, description, amount, type(income/expense), category"
                );
                let Some(details) = prompt_line() else { continue };
                match add_transaction_to_db(&store, &details) {
                    Ok(id) => println!("Transaction {} added successfully!", id),
                    Err(e) => {
                        println!("Error adding transaction: {}", e);
                        println!("Please try again.");
                    }
                }
            }
            UserCommands::Update => {
                println!("Provide the transaction ID to update:");
                let Some(id) = prompt_line() else { continue };
                match current_transaction_details(&store, &id) {
                    Ok(current) => println!("Current details: {}", current),
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                }
                println!(
                    "Enter the new details: \
                     YYYY-MM, description, amount, type(income/expense), category"
                );
                let Some(details) = prompt_line() else { continue };
                match update_transaction_in_db(&store, &id, &details) {
                    Ok(_) => println!("Transaction updated successfully."),
                    Err(e) => println!("Error updating transaction: {}", e),
                }
            }
            UserCommands::Remove => {
                println!("Provide the transaction ID to remove:");
                let Some(id) = prompt_line() else { continue };
                match remove_transaction_from_db(&store, &id) {
                    Ok(_) => println!("Transaction removed successfully."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::Month => {
                println!("Which month? (YYYY-MM, empty for the current month)");
                let Some(text) = prompt_line() else { continue };
                let period = if text.is_empty() {
                    let today = Local::now();
                    Ok((today.year(), today.month()))
                } else {
                    parse_period(&text)
                };
                match period.and_then(|(year, month)| report::monthly_detail(&store, year, month)) {
                    Ok(detail) => out.show(&detail, print_monthly_detail),
                    Err(e) => report_read_failure("monthly detail", &e),
                }
            }
            UserCommands::Summary => {
                let Some(year) = prompt_year() else { continue };
                match report::home_summary(&store, year) {
                    Ok(summary) => out.show(&summary, print_summary),
                    Err(e) => report_read_failure("summary", &e),
                }
            }
            UserCommands::Yearly => {
                let Some(year) = prompt_year() else { continue };
                match report::yearly_series(&store, year) {
                    Ok(series) => out.show(&series, print_yearly_series),
                    Err(e) => report_read_failure("yearly series", &e),
                }
            }
            UserCommands::Categories => {
                let Some(year) = prompt_year() else { continue };
                match report::category_breakdown(&store, year) {
                    Ok(breakdown) => out.show(&breakdown, print_category_breakdown),
                    Err(e) => report_read_failure("category breakdown", &e),
                }
            }
            UserCommands::Help => print_help(),
            UserCommands::Unknown => {
                println!("Unknown command '{}'. Type 'help' for a list.", parts[0])
            }
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
        }
    }
}

impl Output {
    fn show<T: Serialize>(&self, report: &T, print: fn(&Output, &T)) {
        if self.json {
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("Error serializing report: {}", e),
            }
        } else {
            print(self, report);
        }
    }

    fn money(&self, amount: Decimal) -> String {
        if amount.is_sign_negative() && !amount.is_zero() {
            format!("-{}{:.2}", self.currency, amount.abs())
        } else {
            format!("{}{:.2}", self.currency, amount)
        }
    }
}

fn report_read_failure(name: &str, e: &budget_planner::BudgetError) {
    warn!("Failed to build {}: {}", name, e);
    println!("Could not load the {}: {}", name, e);
}

fn print_summary(out: &Output, summary: &HomeSummary) {
    println!("Summary for {}", summary.year);
    println!("  Total income:    {}", out.money(summary.total_income));
    println!("  Total expenses:  {}", out.money(summary.total_expense));
    println!("  Balance:         {}", out.money(summary.balance));
    println!(
        "  Monthly average: {} ({} active months)",
        out.money(summary.monthly_average),
        summary.active_months
    );
}

fn print_monthly_detail(out: &Output, detail: &MonthlyDetail) {
    println!(
        "{} {}: income {}, expenses {}, balance {}",
        month_name(detail.month).unwrap_or("?"),
        detail.year,
        out.money(detail.total_income),
        out.money(detail.total_expense),
        out.money(detail.balance)
    );
    if detail.transactions.is_empty() {
        println!("  No transactions recorded.");
        return;
    }
    for tx in &detail.transactions {
        println!(
            "  #{:<5} {:<8} {:<13} {:>12}  {}",
            tx.id,
            tx.transaction_type,
            tx.category,
            out.money(tx.amount),
            tx.description
        );
    }
}

fn print_yearly_series(out: &Output, series: &YearlySeries) {
    println!("Income (+) and expenses (-) for {}", series.year);
    let width = out.chart_width as f64;
    for month in &series.months {
        let income_bar = scale_to_max(month.income, series.max_magnitude, width).round() as usize;
        let expense_bar = scale_to_max(month.expense, series.max_magnitude, width).round() as usize;
        println!(
            "  {} + {:<w$} {}",
            month_name(month.month).unwrap_or("?"),
            "#".repeat(income_bar),
            out.money(month.income),
            w = out.chart_width
        );
        println!(
            "      - {:<w$} {}",
            "#".repeat(expense_bar),
            out.money(month.expense),
            w = out.chart_width
        );
    }
    println!(
        "  Total income {}, expenses {}, balance {}, monthly average {}",
        out.money(series.total_income),
        out.money(series.total_expense),
        out.money(series.balance),
        out.money(series.monthly_average)
    );
}

fn print_category_breakdown(out: &Output, breakdown: &CategoryBreakdown) {
    println!(
        "Expenses by category for {} (total {})",
        breakdown.year,
        out.money(breakdown.total_expense)
    );
    if breakdown.categories.is_empty() {
        println!("  No expenses recorded.");
        return;
    }
    for share in &breakdown.categories {
        println!(
            "  {:<13} {:>12} {:>6.1}%",
            share.category,
            out.money(share.total),
            share.percentage
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  add         record a transaction");
    println!("  update      replace the details of a transaction by ID");
    println!("  remove      delete a transaction by ID");
    println!("  month       list the transactions of a month");
    println!("  summary     yearly totals, balance and monthly average");
    println!("  yearly      month-by-month income and expenses");
    println!("  categories  share of expenses per category");
    println!("  exit        quit");
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    println!("Categories: {}", labels.join(", "));
}

fn prompt_line() -> Option<String> {
    match read_user_input() {
        Ok(line) => Some(line),
        Err(e) => {
            println!("Error reading input: {}", e);
            None
        }
    }
}

fn prompt_year() -> Option<i32> {
    println!("Which year? (empty for the current year)");
    let text = prompt_line()?;
    if text.is_empty() {
        return Some(Local::now().year());
    }
    match text.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            println!("Invalid year '{}'.", text);
            None
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    let bytes = io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    if bytes == 0 {
        // stdin closed
        return Ok("exit".to_string());
    }
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> UserCommands {
    match input.to_lowercase().as_str() {
        "add" => UserCommands::Add,
        "update" | "edit" => UserCommands::Update,
        "remove" | "delete" => UserCommands::Remove,
        "month" => UserCommands::Month,
        "summary" => UserCommands::Summary,
        "yearly" => UserCommands::Yearly,
        "categories" => UserCommands::Categories,
        "help" => UserCommands::Help,
        "exit" | "quit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}
