use crate::api::types::Court;
use crate::app::state::Tab;
use crate::app::Action;
use crate::calc::penalty;

pub const HELP: &str = "\
Sekmeler:  arama | ceza | faiz
Arama:     ara <kelime>   ornek <n>   mahkeme <ad>   sonraki   onceki   ac <n>   kapat
Ceza:      temel <ay>   indirim <n|kod>
Faiz:      anapara <tutar>   oran <yüzde>   gun <gün>
Genel:     yardim   cikis";

/// Parsed line of terminal input.
#[derive(Debug, PartialEq)]
pub enum Command {
    Apply(Action),
    Help,
    Quit,
    /// Blank line.
    Nothing,
    /// Unrecognized or malformed input, with a message for the user.
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Command::Nothing;
        }

        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };

        match verb.to_lowercase().as_str() {
            "arama" => Command::Apply(Action::SwitchTab(Tab::Search)),
            "ceza" => Command::Apply(Action::SwitchTab(Tab::Penalty)),
            "faiz" => Command::Apply(Action::SwitchTab(Tab::Interest)),
            "ara" => {
                let keyword = (!rest.is_empty()).then(|| rest.to_string());
                Command::Apply(Action::Search(keyword))
            }
            "ornek" | "örnek" => parse_index(rest).map_or_else(invalid_index, |n| {
                Command::Apply(Action::UseExample(n))
            }),
            "mahkeme" => match Court::parse(rest) {
                Some(court) => Command::Apply(Action::SetCourt(court)),
                None => {
                    let keys: Vec<&str> = Court::ALL.iter().map(|c| c.key()).collect();
                    Command::Invalid(format!("Mahkeme şunlardan biri olmalı: {}", keys.join(", ")))
                }
            },
            "sonraki" => Command::Apply(Action::NextPage),
            "onceki" | "önceki" => Command::Apply(Action::PrevPage),
            "ac" | "aç" => parse_index(rest).map_or_else(invalid_index, |n| {
                Command::Apply(Action::OpenDecision(n))
            }),
            "kapat" => Command::Apply(Action::CloseDocument),
            "temel" => match parse_number(rest) {
                Some(months) => Command::Apply(Action::SetBaseMonths(months.round() as u32)),
                None => Command::Invalid("Temel ceza ay olarak bir sayı olmalı".to_string()),
            },
            "indirim" => match rule_id(rest) {
                Some(id) => Command::Apply(Action::ToggleRule(id)),
                None => {
                    let ids: Vec<&str> = penalty::default_rules().iter().map(|r| r.id).collect();
                    Command::Invalid(format!("İndirim 1-{} ya da {} olmalı", ids.len(), ids.join(", ")))
                }
            },
            "anapara" => parse_amount(rest).map_or_else(
                || Command::Invalid("Anapara negatif olmayan bir sayı olmalı".to_string()),
                |v| Command::Apply(Action::SetPrincipal(v)),
            ),
            "oran" => parse_number(rest).map_or_else(
                || Command::Invalid("Oran negatif olmayan bir sayı olmalı".to_string()),
                |v| Command::Apply(Action::SetRate(v)),
            ),
            "gun" | "gün" => match rest.parse::<u32>() {
                Ok(days) => Command::Apply(Action::SetDays(days)),
                Err(_) => Command::Invalid("Gün negatif olmayan bir tam sayı olmalı".to_string()),
            },
            "yardim" | "yardım" | "help" | "?" => Command::Help,
            "cikis" | "çıkış" | "quit" | "exit" | "q" => Command::Quit,
            other => Command::Invalid(format!("Bilinmeyen komut: {} (yardim yazın)", other)),
        }
    }
}

fn invalid_index() -> Command {
    Command::Invalid("Sıra numarası 1 veya daha büyük olmalı".to_string())
}

fn parse_index(input: &str) -> Option<usize> {
    input.parse::<usize>().ok().filter(|n| *n >= 1)
}

/// Money amount: non-negative, `.` groups thousands and `,` marks decimals
/// (`100.000`, `1.500,5`). A lone `.` that does not group is a decimal point.
fn parse_amount(input: &str) -> Option<f64> {
    let normalized = if input.contains(',') {
        input.replace('.', "").replace(',', ".")
    } else if input.matches('.').count() > 1 || is_grouped(input) {
        input.replace('.', "")
    } else {
        input.to_string()
    };
    non_negative(&normalized)
}

/// Plain non-negative number with either `.` or `,` as the decimal mark.
fn parse_number(input: &str) -> Option<f64> {
    non_negative(&input.replace(',', "."))
}

fn non_negative(input: &str) -> Option<f64> {
    input
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// `100.000` style: every dot-separated group after the first has three digits.
fn is_grouped(input: &str) -> bool {
    let mut groups = input.split('.');
    let first = groups.next().unwrap_or("");
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty()
        && !first.is_empty()
        && first.len() <= 3
        && rest.iter().all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Resolve a rule by 1-based position or by id.
fn rule_id(input: &str) -> Option<&'static str> {
    let rules = penalty::default_rules();
    let needle = input.to_lowercase();
    match parse_index(&needle) {
        Some(n) => rules.get(n - 1).map(|r| r.id),
        None => rules.iter().find(|r| r.id == needle).map(|r| r.id),
    }
}
