//! The console session loop.
//!
//! ```text
//! AwaitingLogin --login ok--> RoleMenu(role)
//! RoleMenu(teacher|student) --4--> AwaitingLogin
//! RoleMenu(admin) --5--> process exit
//! ```
//!
//! Every user-level failure is printed and the enclosing loop asks again.

use tracing::{debug, info};

use crate::account::{Account, Credentials, Role};
use crate::console::Console;
use crate::directory::{AccountId, Directory};
use crate::error::SessionError;
use crate::model::Question;

/// Runtime switches for a session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Apply the administrator's add/remove user actions to the directory.
    /// When false those actions only print their confirmation.
    pub admin_edits_directory: bool,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// An administrator chose Exit.
    AdminExit,
    /// The input stream ran out.
    InputClosed,
}

/// Result of one login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(AccountId),
    Rejected,
    InputClosed,
}

/// What a menu loop hands back to the login loop.
enum MenuExit {
    Logout,
    Shutdown(SessionEnd),
}

const CLOSED: MenuExit = MenuExit::Shutdown(SessionEnd::InputClosed);

/// Owns the directory for the lifetime of one process run.
#[derive(Debug)]
pub struct Session {
    directory: Directory,
    config: SessionConfig,
}

impl Session {
    pub fn new(directory: Directory, config: SessionConfig) -> Self {
        Self { directory, config }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn into_directory(self) -> Directory {
        self.directory
    }

    /// Alternate between login and role menus until an administrator exits
    /// or input runs out.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<SessionEnd, SessionError> {
        info!(accounts = self.directory.len(), "session started");
        let end = loop {
            let id = match self.login(console)? {
                LoginOutcome::Authenticated(id) => id,
                LoginOutcome::Rejected => continue,
                LoginOutcome::InputClosed => break SessionEnd::InputClosed,
            };
            let Some(role) = self.directory.get(id).map(Account::role) else {
                continue;
            };

            let exit = match role {
                Role::Administrator => self.admin_menu(console)?,
                Role::Teacher => self.teacher_menu(console, id)?,
                Role::Student => self.student_menu(console)?,
            };
            match exit {
                MenuExit::Logout => debug!(%role, "logged out"),
                MenuExit::Shutdown(end) => break end,
            }
        };
        info!(?end, "session ended");
        Ok(end)
    }

    /// Prompt once for credentials and scan the directory.
    pub fn login(&self, console: &mut dyn Console) -> Result<LoginOutcome, SessionError> {
        let Some(username) = ask_token(console, "Enter Username: ")? else {
            return Ok(LoginOutcome::InputClosed);
        };
        let Some(password) = ask_token(console, "Enter Password: ")? else {
            return Ok(LoginOutcome::InputClosed);
        };

        match self.directory.authenticate(&username, &password) {
            Some(id) => {
                console.write("Login successful!\n")?;
                debug!(%username, "login succeeded");
                Ok(LoginOutcome::Authenticated(id))
            }
            None => {
                console.write("Invalid credentials.\n")?;
                debug!(%username, "login rejected");
                Ok(LoginOutcome::Rejected)
            }
        }
    }

    fn admin_menu(&mut self, console: &mut dyn Console) -> Result<MenuExit, SessionError> {
        loop {
            let Some(choice) = ask_choice(console, Role::Administrator)? else {
                return Ok(CLOSED);
            };
            match choice {
                Some(1) => {
                    if !self.add_user(console)? {
                        return Ok(CLOSED);
                    }
                }
                Some(2) => {
                    let Some(username) = ask_token(console, "Enter username to remove: ")? else {
                        return Ok(CLOSED);
                    };
                    if self.config.admin_edits_directory {
                        let removed = self.directory.remove(&username).is_some();
                        debug!(%username, removed, "remove user");
                    }
                    console.write(&format!("User {username} removed.\n"))?;
                }
                Some(3) => console.write("Viewing test schedule.\n")?,
                Some(4) => console.write("Viewing test performance.\n")?,
                Some(5) => return Ok(MenuExit::Shutdown(SessionEnd::AdminExit)),
                _ => console.write("Invalid choice.\n")?,
            }
        }
    }

    /// Returns false if input ran out mid-dialog.
    fn add_user(&mut self, console: &mut dyn Console) -> Result<bool, SessionError> {
        let Some(username) = ask_token(console, "Enter username: ")? else {
            return Ok(false);
        };
        let Some(password) = ask_token(console, "Enter password: ")? else {
            return Ok(false);
        };
        let Some(role) = ask_token(console, "Enter role (teacher/student): ")? else {
            return Ok(false);
        };

        let (role, confirmation) = match role.as_str() {
            "teacher" => (Role::Teacher, "Teacher added successfully.\n"),
            "student" => (Role::Student, "Student added successfully.\n"),
            _ => {
                console.write("Invalid role.\n")?;
                return Ok(true);
            }
        };

        let account = Account::with_role(role, Credentials::new(username, password));
        console.write(&format!("User {} added.\n", account.username()))?;
        if self.config.admin_edits_directory {
            debug!(username = account.username(), %role, "user registered");
            self.directory.insert(account);
        }
        console.write(confirmation)?;
        Ok(true)
    }

    fn teacher_menu(
        &mut self,
        console: &mut dyn Console,
        id: AccountId,
    ) -> Result<MenuExit, SessionError> {
        loop {
            let Some(choice) = ask_choice(console, Role::Teacher)? else {
                return Ok(CLOSED);
            };
            let Some(teacher) = self.directory.get_mut(id).and_then(Account::as_teacher_mut)
            else {
                return Ok(MenuExit::Logout);
            };
            match choice {
                Some(1) => {
                    let Some(name) = ask_token(console, "Enter test name: ")? else {
                        return Ok(CLOSED);
                    };
                    teacher.create_test(name.as_str());
                    console.write(&format!("Test '{name}' created.\n"))?;
                    debug!(test = %name, "test created");
                }
                Some(2) => {
                    let Some(name) = ask_token(console, "Enter test name to add questions to: ")?
                    else {
                        return Ok(CLOSED);
                    };
                    if teacher.find_test(&name).is_none() {
                        console.write("Test not found.\n")?;
                        continue;
                    }
                    let Some(prompt) = ask_line(console, "Enter question: ")? else {
                        return Ok(CLOSED);
                    };
                    let Some(answer) = ask_line(console, "Enter correct answer: ")? else {
                        return Ok(CLOSED);
                    };
                    match teacher.add_question(&name, Question::new(prompt, answer)) {
                        Ok(()) => {
                            console.write(&format!("Question added to test '{name}'.\n"))?;
                        }
                        Err(_) => console.write("Test not found.\n")?,
                    }
                }
                Some(3) => console.write("Viewing student performance.\n")?,
                Some(4) => return Ok(MenuExit::Logout),
                _ => console.write("Invalid choice.\n")?,
            }
        }
    }

    fn student_menu(&self, console: &mut dyn Console) -> Result<MenuExit, SessionError> {
        loop {
            let Some(choice) = ask_choice(console, Role::Student)? else {
                return Ok(CLOSED);
            };
            match choice {
                Some(1) => {
                    console.write("Test Schedule:\n")?;
                    for test in self.directory.published_tests() {
                        console.write(&format!("Test: {}\n", test.name()))?;
                    }
                }
                Some(2) => {
                    let Some(name) = ask_token(console, "Enter test name to attempt: ")? else {
                        return Ok(CLOSED);
                    };
                    if !self.attempt_test(console, &name)? {
                        return Ok(CLOSED);
                    }
                }
                Some(3) => console.write("Viewing test performance.\n")?,
                Some(4) => return Ok(MenuExit::Logout),
                _ => console.write("Invalid choice.\n")?,
            }
        }
    }

    /// Returns false if input ran out before every question was answered.
    fn attempt_test(&self, console: &mut dyn Console, name: &str) -> Result<bool, SessionError> {
        let tests = self.directory.published_tests();
        let Some(test) = tests.into_iter().find(|t| t.name() == name) else {
            console.write("Test not found.\n")?;
            return Ok(true);
        };

        let mut answers = Vec::with_capacity(test.len());
        for question in test.questions() {
            let Some(answer) = ask_line(console, &format!("{}\nYour answer: ", question.prompt()))?
            else {
                return Ok(false);
            };
            answers.push(answer);
        }

        let score = test.grade(&answers);
        console.write(&format!("Your score for the test '{name}': {score}\n"))?;
        debug!(test = %name, %score, "test attempted");
        Ok(true)
    }
}

/// Write a prompt and read the whole reply line verbatim.
fn ask_line(console: &mut dyn Console, prompt: &str) -> Result<Option<String>, SessionError> {
    console.write(prompt)?;
    Ok(console.read_line()?)
}

/// Write a prompt and read the next non-blank line, trimmed.
fn ask_token(console: &mut dyn Console, prompt: &str) -> Result<Option<String>, SessionError> {
    console.write(prompt)?;
    while let Some(line) = console.read_line()? {
        let token = line.trim();
        if !token.is_empty() {
            return Ok(Some(token.to_string()));
        }
    }
    Ok(None)
}

/// Show a role's menu and read a numeric choice. The inner `None` means the
/// reply was not a number.
fn ask_choice(console: &mut dyn Console, role: Role) -> Result<Option<Option<u32>>, SessionError> {
    Ok(ask_token(console, role.menu())?.map(|t| t.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn run_script(lines: &[&str]) -> (SessionEnd, String, Directory) {
        run_script_with(lines, SessionConfig::default())
    }

    fn run_script_with(lines: &[&str], config: SessionConfig) -> (SessionEnd, String, Directory) {
        let mut session = Session::new(Directory::seeded(), config);
        let mut console = ScriptedConsole::new(lines.iter().copied());
        let end = session.run(&mut console).unwrap();
        (end, console.transcript().to_string(), session.into_directory())
    }

    fn teacher_tests(dir: &Directory) -> Vec<(String, usize)> {
        dir.published_tests()
            .iter()
            .map(|t| (t.name().to_string(), t.len()))
            .collect()
    }

    #[test]
    fn login_success_and_failure() {
        let session = Session::new(Directory::seeded(), SessionConfig::default());

        let mut console = ScriptedConsole::new(["student1", "studentpass"]);
        assert!(matches!(
            session.login(&mut console).unwrap(),
            LoginOutcome::Authenticated(_)
        ));
        assert_eq!(
            console.transcript(),
            "Enter Username: Enter Password: Login successful!\n"
        );

        let mut console = ScriptedConsole::new(["student1", "adminpass"]);
        assert_eq!(session.login(&mut console).unwrap(), LoginOutcome::Rejected);
        assert!(console.transcript().ends_with("Invalid credentials.\n"));

        let mut console = ScriptedConsole::new(["student1"]);
        assert_eq!(
            session.login(&mut console).unwrap(),
            LoginOutcome::InputClosed
        );
    }

    #[test]
    fn failed_login_reprompts() {
        let (end, out, _) = run_script(&["admin1", "nope", "admin1", "adminpass", "5"]);
        assert_eq!(end, SessionEnd::AdminExit);
        assert_eq!(out.matches("Enter Username: ").count(), 2);
        assert!(out.contains("Invalid credentials.\n"));
        assert!(out.contains("Login successful!\nAdmin Menu:\n"));
    }

    #[test]
    fn admin_exit_ends_session() {
        let (end, out, _) = run_script(&["admin1", "adminpass", "3", "4", "9", "x", "5", "unread"]);
        assert_eq!(end, SessionEnd::AdminExit);
        assert!(out.contains("Viewing test schedule.\n"));
        assert!(out.contains("Viewing test performance.\n"));
        assert_eq!(out.matches("Invalid choice.\n").count(), 2);
        assert!(out.ends_with("Enter choice: "));
    }

    #[test]
    fn teacher_exit_returns_to_login() {
        let (end, out, _) = run_script(&["teacher1", "teacherpass", "3", "4"]);
        assert_eq!(end, SessionEnd::InputClosed);
        assert!(out.contains("Viewing student performance.\n"));
        assert!(out.ends_with("Enter choice: Enter Username: "));
    }

    #[test]
    fn end_of_input_closes_session() {
        let (end, out, _) = run_script(&[]);
        assert_eq!(end, SessionEnd::InputClosed);
        assert_eq!(out, "Enter Username: ");
    }

    #[test]
    fn blank_lines_are_skipped_for_tokens() {
        let (end, _, _) = run_script(&["", "  admin1  ", "", "adminpass", "", "5"]);
        assert_eq!(end, SessionEnd::AdminExit);
    }

    #[test]
    fn teacher_creates_test_and_adds_question() {
        let (_, out, dir) = run_script(&[
            "teacher1", "teacherpass", "1", "Math1", "2", "Math1", "2+2?", "4", "4",
        ]);
        assert!(out.contains("Enter test name: Test 'Math1' created.\n"));
        assert!(out.contains(
            "Enter test name to add questions to: Enter question: Enter correct answer: \
             Question added to test 'Math1'.\n"
        ));
        assert_eq!(teacher_tests(&dir), vec![("Math1".to_string(), 1)]);

        let test = dir.published_tests()[0];
        assert!(test.questions()[0].check_answer("4"));
        assert!(!test.questions()[0].check_answer("5"));
    }

    #[test]
    fn adding_question_to_unknown_test_changes_nothing() {
        let (_, out, dir) = run_script(&["teacher1", "teacherpass", "1", "Math1", "2", "History", "4"]);
        assert!(out.contains("Enter test name to add questions to: Test not found.\n"));
        assert!(!out.contains("Enter question: "));
        assert_eq!(teacher_tests(&dir), vec![("Math1".to_string(), 0)]);
    }

    #[test]
    fn duplicate_test_names_are_allowed() {
        let (_, _, dir) = run_script(&["teacher1", "teacherpass", "1", "Quiz", "1", "Quiz", "4"]);
        assert_eq!(
            teacher_tests(&dir),
            vec![("Quiz".to_string(), 0), ("Quiz".to_string(), 0)]
        );
    }

    #[test]
    fn student_attempts_teacher_test() {
        let (_, out, _) = run_script(&[
            "teacher1", "teacherpass", "1", "Math1", "2", "Math1", "2+2?", "4", "4",
            "student1", "studentpass", "1", "2", "Math1", "4", "4",
        ]);
        assert!(out.contains("Test Schedule:\nTest: Math1\n"));
        assert!(out.contains("2+2?\nYour answer: "));
        assert!(out.contains("Your score for the test 'Math1': 1/1\n"));
    }

    #[test]
    fn student_partial_score() {
        let (_, out, _) = run_script(&[
            "teacher1", "teacherpass",
            "1", "Geo",
            "2", "Geo", "Capital of France?", "Paris",
            "2", "Geo", "Capital of Italy?", "Rome",
            "2", "Geo", "Capital of Spain?", "Madrid",
            "4",
            "student1", "studentpass", "2", "Geo", "Paris", "rome", "Madrid ", "4",
        ]);
        assert!(out.contains("Your score for the test 'Geo': 1/3\n"));
    }

    #[test]
    fn student_unknown_test() {
        let (_, out, _) = run_script(&["student1", "studentpass", "2", "Nope", "3", "4"]);
        assert!(out.contains("Enter test name to attempt: Test not found.\n"));
        assert!(out.contains("Viewing test performance.\n"));
    }

    #[test]
    fn empty_schedule() {
        let (_, out, _) = run_script(&["student1", "studentpass", "1", "4"]);
        assert!(out.contains("Test Schedule:\nStudent Menu:"));
    }

    #[test]
    fn added_user_cannot_log_in_by_default() {
        let (_, out, dir) = run_script(&[
            "admin1", "adminpass", "1", "t2", "pw", "teacher", "5",
        ]);
        assert!(out.contains("User t2 added.\nTeacher added successfully.\n"));
        assert_eq!(dir.len(), 3);
        assert!(dir.authenticate("t2", "pw").is_none());
    }

    #[test]
    fn added_user_can_log_in_when_directory_edits_enabled() {
        let config = SessionConfig {
            admin_edits_directory: true,
        };
        let mut session = Session::new(Directory::seeded(), config);
        let mut console = ScriptedConsole::new([
            "admin1", "adminpass", "1", "s2", "pw", "student", "2", "student1", "5",
        ]);
        assert_eq!(session.run(&mut console).unwrap(), SessionEnd::AdminExit);
        assert!(console
            .transcript()
            .contains("User s2 added.\nStudent added successfully.\n"));
        assert!(console.transcript().contains("User student1 removed.\n"));

        let dir = session.directory();
        assert!(dir.authenticate("s2", "pw").is_some());
        assert!(dir.authenticate("student1", "studentpass").is_none());
    }

    #[test]
    fn invalid_role_is_rejected() {
        let config = SessionConfig {
            admin_edits_directory: true,
        };
        let (_, out, dir) = run_script_with(
            &["admin1", "adminpass", "1", "x", "y", "admin", "5"],
            config,
        );
        assert!(out.contains("Enter role (teacher/student): Invalid role.\n"));
        assert!(!out.contains("User x added."));
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn remove_user_only_prints_by_default() {
        let (_, out, dir) = run_script(&["admin1", "adminpass", "2", "student1", "5"]);
        assert!(out.contains("Enter username to remove: User student1 removed.\n"));
        assert!(dir.authenticate("student1", "studentpass").is_some());
    }

    #[test]
    fn input_ends_mid_attempt() {
        let (end, out, _) = run_script(&[
            "teacher1", "teacherpass", "1", "T", "2", "T", "q1", "a1", "2", "T", "q2", "a2", "4",
            "student1", "studentpass", "2", "T", "a1",
        ]);
        assert_eq!(end, SessionEnd::InputClosed);
        assert!(out.ends_with("q2\nYour answer: "));
        assert!(!out.contains("Your score"));
    }
}
