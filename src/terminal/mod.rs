mod command;
mod view;

pub use command::{ Command, ParseCommandError, HELP };
pub use view::render_page;

use crate::chat::{ ChatWidget, SendOutcome };
use crate::context::AppContext;
use crate::pages::{ self, Opened, Page };
use crate::router::Route;
use log::{ error, info, warn };
use std::io::{ self, Write };
use tokio::io::{ AsyncBufRead, AsyncBufReadExt };
use tokio::task::{ JoinError, JoinHandle };

/// Gate redirects never chain deeper than this.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end. A chat reply runs on its own task, so the prompt
/// keeps reading commands while it is outstanding.
pub struct Shell<W: Write> {
    ctx: AppContext,
    page: Page,
    out: W,
    ansi: bool,
    inflight: Option<JoinHandle<SendOutcome>>,
}

impl<W: Write> Shell<W> {
    pub fn new(ctx: AppContext, out: W, ansi: bool) -> Self {
        let page = match pages::open(Route::Landing, &ctx) {
            Opened::Page(page) => page,
            Opened::Redirect(_) => Page::Login(pages::login::LoginPage::new()),
        };
        Self {
            ctx,
            page,
            out,
            ansi,
            inflight: None,
        }
    }

    pub fn route(&self) -> Route {
        self.page.route()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", line.as_ref())
    }

    pub fn render(&mut self) -> io::Result<()> {
        for line in render_page(&self.page, self.ansi) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }

    /// Leaves the current page and opens `route`, following gate redirects.
    pub async fn navigate(&mut self, mut route: Route) -> io::Result<()> {
        self.page.unmount();
        for _ in 0..MAX_REDIRECTS {
            match pages::open(route, &self.ctx) {
                Opened::Page(mut page) => {
                    info!("Navigated to {}", route);
                    if matches!(page, Page::Citizen(_) | Page::Hospital(_)) {
                        self.say("Loading...")?;
                    }
                    page.load(&self.ctx).await;
                    self.page = page;
                    return self.render();
                }
                Opened::Redirect(next) => {
                    self.say(format!("{} requires login, redirecting to {}", route, next))?;
                    route = next;
                }
            }
        }
        warn!("Too many redirects while opening {}", route);
        self.say("Too many redirects")
    }

    pub async fn navigate_path(&mut self, path: &str) -> io::Result<()> {
        match Route::from_path(path) {
            Some(route) => self.navigate(route).await,
            None => self.say(format!("No page at {}", path)),
        }
    }

    pub async fn handle(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Help => {
                for (usage, description) in HELP {
                    writeln!(self.out, "  {:<28} {}", usage, description)?;
                }
            }
            Command::Show => self.render()?,
            Command::Go(path) => self.navigate_path(&path).await?,
            Command::Quit => {
                if let Some(handle) = self.inflight.take() {
                    handle.abort();
                }
                self.page.unmount();
                return Ok(Flow::Quit);
            }
            Command::Login { email, password } => self.login(&email, &password).await?,
            Command::Ask(text) => self.ask(&text)?,
            Command::ToggleChat => {
                if let Page::Landing(page) = &mut self.page {
                    page.toggle_chat();
                    self.render()?;
                } else {
                    self.say("The wellness chat lives on the landing page")?;
                }
            }
            Command::Logout => {
                let next = match &self.page {
                    Page::Citizen(page) => Some(page.logout(&self.ctx)),
                    Page::Hospital(page) => Some(page.logout(&self.ctx)),
                    _ => None,
                };
                match next {
                    Some(route) => self.navigate(route).await?,
                    None => self.say("Not on a dashboard")?,
                }
            }
        }
        Ok(Flow::Continue)
    }

    async fn login(&mut self, email: &str, password: &str) -> io::Result<()> {
        let Page::Login(page) = &mut self.page else {
            return self.say("Open the login page first: go /login");
        };
        match page.submit(&self.ctx, email, password).await {
            Some(route) => {
                if let Some(message) = page.message() {
                    let message = message.to_string();
                    self.say(message)?;
                }
                self.navigate(route).await
            }
            None => self.render(),
        }
    }

    /// Accepts the question and returns at once; the reply settles on its own
    /// task and is drawn when it lands.
    fn ask(&mut self, text: &str) -> io::Result<()> {
        let Some(chat) = self.page.chat_for_input() else {
            return self.say("There is no assistant on this page");
        };
        match chat.begin(text) {
            Ok(pending) => {
                self.inflight = Some(tokio::spawn(pending.finish()));
                self.render()
            }
            Err(outcome) => self.report(&chat, outcome),
        }
    }

    fn report(&mut self, chat: &ChatWidget, outcome: SendOutcome) -> io::Result<()> {
        match outcome {
            SendOutcome::Rejected(kind) if chat.variant().alerts_on_empty() => {
                self.say(format!("[alert] {}", kind))
            }
            SendOutcome::Rejected(_) | SendOutcome::Discarded => Ok(()),
            SendOutcome::Busy => self.say("Still waiting for the previous reply"),
            SendOutcome::Replied | SendOutcome::FellBack(_) => self.render(),
        }
    }

    fn settle(&mut self, joined: Result<SendOutcome, JoinError>) -> io::Result<()> {
        self.inflight = None;
        match joined {
            // The page it belonged to is gone.
            Ok(SendOutcome::Discarded) => Ok(()),
            Ok(outcome) => {
                info!("Chat reply settled: {:?}", outcome);
                self.render()
            }
            Err(e) => {
                error!("Chat request task failed: {}", e);
                Ok(())
            }
        }
    }

    /// Waits for the outstanding reply, if any, and draws it.
    pub async fn settle_pending(&mut self) -> io::Result<()> {
        match self.inflight.take() {
            Some(handle) => {
                let joined = handle.await;
                self.settle(joined)
            }
            None => Ok(()),
        }
    }

    /// Reads commands until end of input or `quit`. A reply still outstanding
    /// when input ends is waited for; `quit` drops it.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> io::Result<()> {
        let start = self.ctx.config.start_route.clone();
        if Route::from_path(&start).is_some() {
            self.navigate_path(&start).await?;
        } else {
            warn!("Unknown start route '{}', opening the landing page", start);
            self.render()?;
        }

        let mut lines = input.lines();
        loop {
            let route = self.route();
            write!(self.out, "surgesense{}> ", route)?;
            self.out.flush()?;
            tokio::select! {
                joined = next_reply(&mut self.inflight) => {
                    writeln!(self.out)?;
                    self.settle(joined)?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match Command::parse(&line) {
                        Ok(Some(command)) => {
                            if self.handle(command).await? == Flow::Quit {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => self.say(e.to_string())?,
                    }
                }
            }
        }
        self.settle_pending().await?;
        self.page.unmount();
        Ok(())
    }
}

async fn next_reply(
    inflight: &mut Option<JoinHandle<SendOutcome>>
) -> Result<SendOutcome, JoinError> {
    match inflight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}
