use anyhow::{Context, Result};
use std::fmt;
use std::io::{BufRead, Write};
use thiserror::Error;

use crate::config::Config;
use crate::engine::{
    AccountAttribute, AccountOperationError, AccountSnapshot, Amount, CURRENCY, TransactionType,
    validate_amount,
};
use crate::session::{SearchCriterion, Session};

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Input closed")]
    InputClosed,

    #[error("Reading input failed")]
    InputFailed(#[source] std::io::Error),

    #[error("Unknown menu item {0}, enter a number from 0 to 10")]
    UnknownMenuItem(u32),

    #[error("Unknown search type {0}")]
    UnknownSearchType(u32),

    #[error("No accounts to search")]
    NoAccounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    OpenAccount,
    Deposit,
    Withdraw,
    ShowBalance,
    ListTransactions,
    SearchTransactions,
    ExportText,
    CloseAccount,
    SearchAccounts,
    ExportCsv,
    Exit,
}

impl MenuItem {
    const ORDERED: [MenuItem; 11] = [
        MenuItem::OpenAccount,
        MenuItem::Deposit,
        MenuItem::Withdraw,
        MenuItem::ShowBalance,
        MenuItem::ListTransactions,
        MenuItem::SearchTransactions,
        MenuItem::ExportText,
        MenuItem::CloseAccount,
        MenuItem::SearchAccounts,
        MenuItem::ExportCsv,
        MenuItem::Exit,
    ];

    pub fn number(&self) -> u32 {
        match self {
            MenuItem::Exit => 0,
            MenuItem::OpenAccount => 1,
            MenuItem::Deposit => 2,
            MenuItem::Withdraw => 3,
            MenuItem::ShowBalance => 4,
            MenuItem::ListTransactions => 5,
            MenuItem::SearchTransactions => 6,
            MenuItem::ExportText => 7,
            MenuItem::CloseAccount => 8,
            MenuItem::SearchAccounts => 9,
            MenuItem::ExportCsv => 10,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MenuItem::OpenAccount => "Open account",
            MenuItem::Deposit => "Deposit money",
            MenuItem::Withdraw => "Withdraw money",
            MenuItem::ShowBalance => "Show balance",
            MenuItem::ListTransactions => "List transactions",
            MenuItem::SearchTransactions => "Search transactions",
            MenuItem::ExportText => "Save to file",
            MenuItem::CloseAccount => "Close account",
            MenuItem::SearchAccounts => "Search accounts by attributes",
            MenuItem::ExportCsv => "Export ledger to CSV",
            MenuItem::Exit => "Exit",
        }
    }
}

impl TryFrom<u32> for MenuItem {
    type Error = ShellError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        MenuItem::ORDERED
            .into_iter()
            .find(|item| item.number() == value)
            .ok_or(ShellError::UnknownMenuItem(value))
    }
}

/// Numbered menu loop over any line-oriented input and output.
pub struct Shell<R, W> {
    session: Session,
    config: Config,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, config: Config, input: R, output: W) -> Self {
        Shell {
            session,
            config,
            input,
            output,
        }
    }

    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.output)
    }

    /// Runs until the exit command or the end of input. Only failing to read from or write to the
    /// terminal is an error.
    pub fn run(&mut self) -> std::io::Result<()> {
        self.say("=== Bank account ===")?;

        loop {
            self.show_menu()?;

            let control = match self.read_menu_choice() {
                Ok(item) => {
                    log::debug!("Menu choice: {item:?}");
                    self.dispatch(item)
                }
                Err(e) => Err(e),
            };

            match control {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(e) => match e.downcast::<ShellError>() {
                    Ok(ShellError::InputClosed) => {
                        self.say("")?;
                        self.say("Exiting...")?;
                        break;
                    }
                    Ok(ShellError::InputFailed(source)) => {
                        log::error!("Reading input failed: {source}");
                        return Err(source);
                    }
                    Ok(other) => self.report(&other.into())?,
                    Err(e) => self.report(&e)?,
                },
            }
        }

        Ok(())
    }

    pub fn dispatch(&mut self, item: MenuItem) -> Result<LoopControl> {
        match item {
            MenuItem::OpenAccount => self.open_account()?,
            MenuItem::Deposit => self.deposit()?,
            MenuItem::Withdraw => self.withdraw()?,
            MenuItem::ShowBalance => self.show_balance()?,
            MenuItem::ListTransactions => self.list_transactions()?,
            MenuItem::SearchTransactions => self.search_transactions()?,
            MenuItem::ExportText => self.export_text()?,
            MenuItem::CloseAccount => self.close_account()?,
            MenuItem::SearchAccounts => self.search_accounts()?,
            MenuItem::ExportCsv => self.export_csv()?,
            MenuItem::Exit => {
                self.say("Exiting...")?;
                return Ok(LoopControl::Exit);
            }
        }
        Ok(LoopControl::Continue)
    }

    fn report(&mut self, e: &anyhow::Error) -> std::io::Result<()> {
        log::warn!("Command failed: {e:#}");
        self.say(format_args!("Error: {e:#}"))
    }

    fn show_menu(&mut self) -> std::io::Result<()> {
        self.say("")?;
        self.say("=== MAIN MENU ===")?;
        for item in MenuItem::ORDERED {
            writeln!(self.output, "{}. {}", item.number(), item.title())?;
        }
        write!(self.output, "Choose an operation: ")?;
        self.output.flush()
    }

    fn read_menu_choice(&mut self) -> Result<MenuItem> {
        let number = self.read_number()?;
        Ok(MenuItem::try_from(number)?)
    }

    fn open_account(&mut self) -> Result<()> {
        self.session.ensure_can_open()?;

        let number = self.prompt("Enter account number")?;
        let bik = self.prompt("Enter BIK")?;
        let kpp = self.prompt("Enter KPP")?;

        self.session.open_account(&number, &bik, &kpp)?;
        self.say(format_args!("Account opened. Account number: {number}"))?;
        Ok(())
    }

    fn deposit(&mut self) -> Result<()> {
        self.session.ensure_active()?;

        let amount = self.prompt_amount("Enter amount to deposit")?;
        validate_amount(amount)?;
        let description = self.prompt("Enter operation description")?;

        let balance = self.session.deposit(amount, &description)?;
        self.say(format_args!("Deposited {amount} {CURRENCY}"))?;
        self.say(format_args!("Current balance: {balance} {CURRENCY}"))?;
        Ok(())
    }

    fn withdraw(&mut self) -> Result<()> {
        let available = self.session.balance()?;

        let amount = self.prompt_amount("Enter amount to withdraw")?;
        validate_amount(amount)?;
        if amount > available {
            return Err(AccountOperationError::InsufficientFunds { available }.into());
        }
        let description = self.prompt("Enter operation description")?;

        let balance = self.session.withdraw(amount, &description)?;
        self.say(format_args!("Withdrew {amount} {CURRENCY}"))?;
        self.say(format_args!("Current balance: {balance} {CURRENCY}"))?;
        Ok(())
    }

    fn show_balance(&mut self) -> Result<()> {
        let balance = self.session.balance()?;
        self.say(format_args!("Current balance: {balance} {CURRENCY}"))?;
        Ok(())
    }

    fn list_transactions(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .session
            .transactions()?
            .iter()
            .enumerate()
            .map(|(i, tx)| format!("{}. {}", i + 1, tx))
            .collect();

        self.say("Transaction history:")?;
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    fn search_transactions(&mut self) -> Result<()> {
        self.session.ensure_active()?;

        self.say("Search transactions by:")?;
        self.say("1. Operation type")?;
        self.say("2. Amount")?;
        self.say("3. Description")?;
        let criterion = match self.prompt_number("Choose search type")? {
            1 => {
                let labels: Vec<&str> = TransactionType::ALL.iter().map(|t| t.label()).collect();
                let prompt = format!("Enter operation type ({})", labels.join("/"));
                SearchCriterion::Kind(self.prompt(&prompt)?)
            }
            2 => SearchCriterion::Amount(self.prompt_amount("Enter amount to search for")?),
            3 => SearchCriterion::Description(self.prompt("Enter text to search in descriptions")?),
            other => return Err(ShellError::UnknownSearchType(other).into()),
        };

        let found: Vec<String> = self
            .session
            .search_transactions(&criterion)?
            .map(ToString::to_string)
            .collect();

        if found.is_empty() {
            self.say("No transactions match the given criteria.")?;
            return Ok(());
        }
        self.say("Search results:")?;
        for line in found {
            self.say(line)?;
        }
        Ok(())
    }

    fn export_text(&mut self) -> Result<()> {
        let path = self.config.text_export_path.clone();
        self.session
            .export_to_text(&path)
            .with_context(|| format!("Saving to '{}' failed", path.display()))?;
        self.say(format_args!("Data saved to '{}'", path.display()))?;
        Ok(())
    }

    fn export_csv(&mut self) -> Result<()> {
        let path = self.config.csv_export_path.clone();
        self.session
            .export_to_csv(&path)
            .with_context(|| format!("Exporting to '{}' failed", path.display()))?;
        self.say(format_args!("Ledger exported to '{}'", path.display()))?;
        Ok(())
    }

    fn close_account(&mut self) -> Result<()> {
        self.session.close_account()?;
        self.say("Account closed.")?;
        self.say("Open a new account to continue banking operations.")?;
        Ok(())
    }

    fn search_accounts(&mut self) -> Result<()> {
        if self.session.registry().is_empty() {
            return Err(ShellError::NoAccounts.into());
        }

        self.say("Search account by:")?;
        self.say("1. Account number")?;
        self.say("2. BIK")?;
        self.say("3. KPP")?;
        let attribute = match self.prompt_number("Choose search type")? {
            1 => AccountAttribute::Number,
            2 => AccountAttribute::RoutingCode,
            3 => AccountAttribute::TaxCode,
            other => return Err(ShellError::UnknownSearchType(other).into()),
        };
        let value = self.prompt("Enter value to search for")?;

        let found: Vec<AccountSnapshot> = self
            .session
            .search_accounts(attribute, &value)
            .map(AccountSnapshot::from)
            .collect();

        if found.is_empty() {
            self.say("No accounts with the given attributes were found.")?;
            return Ok(());
        }
        for snapshot in found {
            self.say("Account found:")?;
            self.say(format_args!("Number: {}", snapshot.number))?;
            self.say(format_args!("BIK: {}", snapshot.bik))?;
            self.say(format_args!("KPP: {}", snapshot.kpp))?;
            self.say(format_args!("Balance: {} {CURRENCY}", snapshot.balance))?;
            self.say(format_args!("Status: {}", snapshot.status))?;
            self.say(format_args!("Transactions: {}", snapshot.transactions))?;
            self.say("---")?;
        }
        Ok(())
    }

    fn say(&mut self, message: impl fmt::Display) -> std::io::Result<()> {
        writeln!(self.output, "{message}")
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{text}: ")?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_number(&mut self, text: &str) -> Result<u32> {
        write!(self.output, "{text}: ")?;
        self.output.flush()?;
        self.read_number()
    }

    fn prompt_amount(&mut self, text: &str) -> Result<Amount> {
        let raw = self.prompt(text)?;
        raw.parse::<Amount>()
            .with_context(|| format!("Expected an amount such as 150.25, got '{}'", raw.trim()))
    }

    fn read_number(&mut self) -> Result<u32> {
        let raw = self.read_line()?;
        raw.trim()
            .parse::<u32>()
            .with_context(|| format!("Expected a number, got '{}'", raw.trim()))
    }

    /// Next line without its line ending.
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(ShellError::InputFailed)?;
        if read == 0 {
            return Err(ShellError::InputClosed.into());
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }
}
