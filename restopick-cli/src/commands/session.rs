//! Session command - interactive voting shell
//!
//! Reads one command per line. On a terminal the shell prompts with
//! dialoguer; with piped input it reads stdin silently so sessions can be
//! scripted:
//! ```text
//! printf 'mode popularity\nselect 3\nvote\nquit\n' | rp session --demo --json
//! ```

use std::io::{self, BufRead};

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use dialoguer::Input;
use serde::Serialize;

use super::get_context;
use crate::output;
use restopick_core::services::Screen;
use restopick_core::{
    EntryPoint, FilterCriteria, Outcome, RankedRestaurant, RestaurantGroup, RestoPickContext,
    Restaurant, SelectionMode, User,
};

const HELP: &str = "\
  mode popularity|filters|serendipity   open a selection screen
  groups                                open the group formation screen
  filter cuisine [NAME]                 keep one cuisine (no name: any)
  filter distance KM                    maximum distance
  filter search [TEXT]                  match name or cuisine (no text: any)
  filter reset                          back to the default filters
  select ID                             show a restaurant's details
  vote [ID]                             vote for the restaurant shown
  join ID                               join a group
  back                                  previous screen
  home                                  leave the confirmation screen
  show                                  redraw the current screen
  trending                              most voted restaurants
  whoami                                current user
  login demo|EMAIL                      start a session
  logout                                end the session
  quit                                  leave the shell";

/// Change to the filters of the filters screen
#[derive(Debug, Clone, PartialEq)]
enum FilterUpdate {
    Cuisine(Option<String>),
    MaxDistance(f64),
    Search(Option<String>),
    Reset,
}

/// One line of shell input
#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Mode(SelectionMode),
    Groups,
    Filter(FilterUpdate),
    Select(String),
    Vote(Option<String>),
    Join(String),
    Back,
    Home,
    Show,
    Trending,
    WhoAmI,
    /// `None` logs in as the demo user
    Login(Option<String>),
    Logout,
    Help,
    Quit,
}

fn required<'a>(arg: Option<&'a str>, usage: &str) -> Result<&'a str> {
    arg.ok_or_else(|| anyhow!("usage: {}", usage))
}

fn optional_text(rest: &str) -> Option<String> {
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Parse one input line; blank lines and `#` comments yield `None`
fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let arg = rest.split_whitespace().next();

    let command = match word.to_lowercase().as_str() {
        "mode" => ShellCommand::Mode(required(arg, "mode popularity|filters|serendipity")?.parse()?),
        "groups" => ShellCommand::Groups,
        "filter" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let update = match field {
                "cuisine" => FilterUpdate::Cuisine(optional_text(value)),
                "search" => FilterUpdate::Search(optional_text(value)),
                "distance" => {
                    let km: f64 = required(optional_text(value).as_deref(), "filter distance KM")?
                        .parse()
                        .map_err(|_| anyhow!("distance must be a number of km"))?;
                    if !km.is_finite() || km < 0.0 {
                        bail!("distance must be a non-negative number of km");
                    }
                    FilterUpdate::MaxDistance(km)
                }
                "reset" => FilterUpdate::Reset,
                _ => bail!("usage: filter cuisine|distance|search|reset ..."),
            };
            ShellCommand::Filter(update)
        }
        "select" => ShellCommand::Select(required(arg, "select ID")?.to_string()),
        "vote" => ShellCommand::Vote(arg.map(str::to_string)),
        "join" => ShellCommand::Join(required(arg, "join ID")?.to_string()),
        "back" => ShellCommand::Back,
        "home" => ShellCommand::Home,
        "show" | "ls" => ShellCommand::Show,
        "trending" => ShellCommand::Trending,
        "whoami" => ShellCommand::WhoAmI,
        "login" => match required(arg, "login demo|EMAIL")? {
            "demo" => ShellCommand::Login(None),
            identity => ShellCommand::Login(Some(identity.to_string())),
        },
        "logout" => ShellCommand::Logout,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command: {} (try `help`)", other),
    };

    Ok(Some(command))
}

/// What the shell shows for the current screen
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    screen: &'static str,
    user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<SelectionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<FilterCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recent_history: Option<Vec<Restaurant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restaurants: Option<Vec<RankedRestaurant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<Vec<RestaurantGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restaurant: Option<RankedRestaurant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    colleagues: Option<Vec<User>>,
}

impl Snapshot {
    fn capture(ctx: &RestoPickContext) -> Result<Self> {
        let picker = &ctx.picker;
        let mut snapshot = Snapshot {
            screen: picker.state().screen_name(),
            user: picker.current_user().cloned(),
            ..Snapshot::default()
        };

        let Some(session) = picker.state().active() else {
            return Ok(snapshot);
        };

        let ranked = |restaurant: &Restaurant| RankedRestaurant {
            count: picker.vote_count(&restaurant.id),
            restaurant: restaurant.clone(),
        };

        match &session.screen {
            Screen::Home => {
                snapshot.recent_history = Some(picker.recent_history().to_vec());
                snapshot.restaurants = Some(picker.list_trending(ctx.config.trending_count));
            }
            Screen::Selection { mode } => {
                snapshot.mode = Some(*mode);
                if *mode == SelectionMode::Filters {
                    snapshot.filter = Some(picker.filter().clone());
                }
                snapshot.restaurants = Some(picker.selection_view()?);
            }
            Screen::GroupFormation => {
                snapshot.groups = Some(picker.list_groups());
            }
            Screen::Details { restaurant, .. } | Screen::Confirmation { restaurant } => {
                snapshot.restaurant = Some(ranked(restaurant));
                snapshot.colleagues = Some(picker.colleagues_for(&restaurant.id));
            }
        }

        Ok(snapshot)
    }

    fn render(&self) {
        println!();
        let Some(user) = &self.user else {
            output::info("Not logged in. Use `login demo` or `login EMAIL`.");
            return;
        };

        match self.screen {
            "home" => {
                println!("{} {}", "Hi".bold(), user.name.bold());
                if let Some(history) = &self.recent_history {
                    let names: Vec<&str> = history.iter().map(|r| r.name.as_str()).collect();
                    println!("Recently: {}", names.join(", "));
                }
                if let Some(trending) = self.restaurants.as_deref().filter(|t| !t.is_empty()) {
                    println!("{}", "Trending today".bold());
                    println!("{}", output::ranked_table(trending));
                }
                output::info("Pick a mode (`mode popularity|filters|serendipity`) or see `groups`.");
            }
            "selection" => {
                if let Some(mode) = self.mode {
                    println!("{}", format!("Choose by {}", mode).bold());
                }
                if let Some(filter) = &self.filter {
                    println!(
                        "Cuisine: {}  Max distance: {}  Search: {}",
                        filter.cuisine.as_deref().unwrap_or("any"),
                        output::format_distance(filter.max_distance),
                        filter.search_text.as_deref().unwrap_or("-")
                    );
                }
                match self.restaurants.as_deref() {
                    Some(list) if !list.is_empty() => println!("{}", output::ranked_table(list)),
                    _ => output::warning("No restaurant matches."),
                }
            }
            "group_formation" => {
                println!("{}", "Groups".bold());
                let groups = self.groups.as_deref().unwrap_or(&[]);
                if groups.is_empty() {
                    output::warning("Nobody has voted yet.");
                }
                for group in groups {
                    let names: Vec<&str> = group.colleagues.iter().map(|c| c.name.as_str()).collect();
                    println!(
                        "  [{}] {} ({} vote(s)) {}",
                        group.restaurant.id,
                        group.restaurant.name.bold(),
                        group.count,
                        names.join(", ").dimmed()
                    );
                }
            }
            "details" | "confirmation" => self.render_restaurant(),
            _ => {}
        }
    }

    fn render_restaurant(&self) {
        let Some(entry) = &self.restaurant else {
            return;
        };
        let r = &entry.restaurant;

        if self.screen == "confirmation" {
            output::success(&format!("You're going to {}!", r.name));
        } else {
            println!("{}", r.name.bold());
            println!("  {} · {} · {}", r.cuisine, r.price_tier, output::format_distance(r.distance));
            println!("  {:.1}/5 ({} reviews)", r.rating, r.review_count);
            if !r.address.is_empty() {
                println!("  {}", r.address);
            }
            if !r.opening_hours.is_empty() {
                println!("  Open {}", r.opening_hours);
            }
            if !r.description.is_empty() {
                println!("  {}", r.description.dimmed());
            }
        }

        println!("  Votes: {}", entry.count);
        let colleagues = self.colleagues.as_deref().unwrap_or(&[]);
        if !colleagues.is_empty() {
            let names: Vec<&str> = colleagues.iter().map(|c| c.name.as_str()).collect();
            println!("  Going: {}", names.join(", "));
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Shell {
    ctx: RestoPickContext,
    json: bool,
}

impl Shell {
    fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        let picker = &mut self.ctx.picker;

        match command {
            ShellCommand::Mode(mode) => picker.select_mode(mode)?,
            ShellCommand::Groups => picker.view_groups()?,
            ShellCommand::Filter(update) => {
                let mut criteria = picker.filter().clone();
                match update {
                    FilterUpdate::Cuisine(cuisine) => criteria.cuisine = cuisine,
                    FilterUpdate::MaxDistance(km) => criteria.max_distance = km,
                    FilterUpdate::Search(text) => criteria.search_text = text,
                    FilterUpdate::Reset => criteria = FilterCriteria::new(self.ctx.config.default_max_distance),
                }
                picker.set_filter(criteria)?;
            }
            ShellCommand::Select(id) => {
                picker.select_restaurant(&id)?;
            }
            ShellCommand::Vote(id) => {
                let shown = picker
                    .state()
                    .active()
                    .and_then(|s| s.selected_restaurant())
                    .map(|r| r.id.clone());
                let Some(id) = id.or(shown) else {
                    bail!("open a restaurant with `select ID` before voting");
                };
                picker.cast_vote(&id)?;
            }
            ShellCommand::Join(id) => {
                picker.join_group(&id)?;
            }
            ShellCommand::Back => picker.back()?,
            ShellCommand::Home => picker.go_home()?,
            ShellCommand::Login(identity) => {
                match identity {
                    Some(identity) => picker.login(&identity)?,
                    None => picker.login_demo()?,
                };
            }
            ShellCommand::Logout => picker.logout()?,
            ShellCommand::Show => {}
            ShellCommand::Trending => {
                let trending = picker.list_trending(self.ctx.config.trending_count);
                return self.print_extra(&trending, |t| println!("{}", output::ranked_table(t)));
            }
            ShellCommand::WhoAmI => {
                let user = picker.current_user().cloned();
                return self.print_extra(&user, |u| match u {
                    Some(u) => println!("{} <{}>", u.name, u.email),
                    None => output::info("Not logged in."),
                });
            }
            ShellCommand::Help => {
                if !self.json {
                    println!("{}", HELP);
                }
                return Ok(Flow::Continue);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        self.show()?;
        Ok(Flow::Continue)
    }

    /// Print a read-only answer that is not part of the screen
    fn print_extra<T: Serialize>(&self, value: &T, render: impl FnOnce(&T)) -> Result<Flow> {
        if self.json {
            println!("{}", serde_json::to_string(&Outcome::success(value))?);
        } else {
            render(value);
        }
        Ok(Flow::Continue)
    }

    fn show(&self) -> Result<()> {
        let snapshot = Snapshot::capture(&self.ctx)?;
        if self.json {
            println!("{}", serde_json::to_string(&Outcome::success(snapshot))?);
        } else {
            snapshot.render();
        }
        Ok(())
    }

    fn report(&self, error: &anyhow::Error) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(&Outcome::<Snapshot>::failure(format!("{:#}", error)))?);
        } else {
            output::error(&format!("{:#}", error));
        }
        Ok(())
    }

    /// Run one input line, reporting failures without leaving the shell
    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let outcome = parse_line(line).and_then(|command| match command {
            Some(command) => self.execute(command),
            None => Ok(Flow::Continue),
        });

        match outcome {
            Ok(flow) => Ok(flow),
            Err(e) => {
                self.report(&e)?;
                Ok(Flow::Continue)
            }
        }
    }
}

fn prompt(ctx: &RestoPickContext) -> String {
    format!("rp:{}", ctx.picker.state().screen_name())
}

pub fn run(demo: bool, email: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context(EntryPoint::Shell)?;
    let interactive = atty::is(atty::Stream::Stdin);
    let mut shell = Shell { ctx, json };

    let first = match (demo, email) {
        (true, _) => Some(ShellCommand::Login(None)),
        (false, Some(email)) => Some(ShellCommand::Login(Some(email))),
        (false, None) if interactive && !json => {
            let email: String = Input::new()
                .with_prompt("Email (blank for the demo account)")
                .allow_empty(true)
                .interact_text()?;
            let email = email.trim();
            Some(ShellCommand::Login((!email.is_empty()).then(|| email.to_string())))
        }
        (false, None) => None,
    };

    match first {
        Some(command) => {
            if let Err(e) = shell.execute(command) {
                shell.report(&e)?;
            }
        }
        None => shell.show()?,
    }

    if interactive && !json {
        output::info("Type `help` for commands.");
        // Ctrl-D or Ctrl-C at the prompt ends the session
        while let Ok(line) = Input::<String>::new()
            .with_prompt(prompt(&shell.ctx))
            .allow_empty(true)
            .interact_text()
        {
            if let Flow::Quit = shell.handle_line(&line)? {
                break;
            }
        }
    } else {
        for line in io::stdin().lock().lines() {
            if let Flow::Quit = shell.handle_line(&line?)? {
                break;
            }
        }
    }

    Ok(())
}
