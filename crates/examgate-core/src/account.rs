//! Accounts and their roles.
//!
//! The set of roles is closed, so an account is a tagged union over the three
//! variants rather than a trait object. Only teachers own data (their tests).

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, TestNotFound};
use crate::model::{Question, Test};

const ADMIN_MENU: &str = "Admin Menu:\n\
1. Add User\n\
2. Remove User\n\
3. View Test Schedule\n\
4. View Test Performance\n\
5. Exit\n\
Enter choice: ";

const TEACHER_MENU: &str = "Teacher Menu:\n\
1. Create Test\n\
2. Add Questions to Test\n\
3. View Student Performance\n\
4. Exit\n\
Enter choice: ";

const STUDENT_MENU: &str = "Student Menu:\n\
1. View Test Schedule\n\
2. Attempt Test\n\
3. View Test Performance\n\
4. Exit\n\
Enter choice: ";

/// The role an account plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Administrator,
    Teacher,
    Student,
}

impl Role {
    /// The numbered menu shown after login, ending in the choice prompt.
    pub fn menu(&self) -> &'static str {
        match self {
            Role::Administrator => ADMIN_MENU,
            Role::Teacher => TEACHER_MENU,
            Role::Student => STUDENT_MENU,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "admin"),
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Role::Administrator),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(ConfigError::UnknownRole(other.to_string())),
        }
    }
}

/// Username and plaintext password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A teacher owns the tests it creates.
#[derive(Debug, Clone, Default)]
pub struct Teacher {
    tests: Vec<Test>,
}

impl Teacher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty test. Duplicate names are allowed.
    pub fn create_test(&mut self, name: impl Into<String>) -> &Test {
        self.tests.push(Test::new(name));
        &self.tests[self.tests.len() - 1]
    }

    /// Insert a fully built test (used when seeding from configuration).
    pub fn push_test(&mut self, test: Test) {
        self.tests.push(test);
    }

    /// First test with exactly this name.
    pub fn find_test(&self, name: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.name() == name)
    }

    pub fn find_test_mut(&mut self, name: &str) -> Option<&mut Test> {
        self.tests.iter_mut().find(|t| t.name() == name)
    }

    /// Append a question to the first test named `test_name`.
    pub fn add_question(&mut self, test_name: &str, question: Question) -> Result<(), TestNotFound> {
        let test = self
            .find_test_mut(test_name)
            .ok_or_else(|| TestNotFound(test_name.to_string()))?;
        test.add_question(question);
        Ok(())
    }

    /// Tests in creation order.
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }
}

/// A registered user.
#[derive(Debug, Clone)]
pub enum Account {
    Administrator(Credentials),
    Teacher(Credentials, Teacher),
    Student(Credentials),
}

impl Account {
    pub fn administrator(username: impl Into<String>, password: impl Into<String>) -> Self {
        Account::Administrator(Credentials::new(username, password))
    }

    pub fn teacher(username: impl Into<String>, password: impl Into<String>) -> Self {
        Account::Teacher(Credentials::new(username, password), Teacher::new())
    }

    pub fn student(username: impl Into<String>, password: impl Into<String>) -> Self {
        Account::Student(Credentials::new(username, password))
    }

    /// Build an account with no tests for the given role.
    pub fn with_role(role: Role, credentials: Credentials) -> Self {
        match role {
            Role::Administrator => Account::Administrator(credentials),
            Role::Teacher => Account::Teacher(credentials, Teacher::new()),
            Role::Student => Account::Student(credentials),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        match self {
            Account::Administrator(c) | Account::Teacher(c, _) | Account::Student(c) => c,
        }
    }

    pub fn username(&self) -> &str {
        &self.credentials().username
    }

    pub fn password(&self) -> &str {
        &self.credentials().password
    }

    pub fn role(&self) -> Role {
        match self {
            Account::Administrator(_) => Role::Administrator,
            Account::Teacher(..) => Role::Teacher,
            Account::Student(_) => Role::Student,
        }
    }

    pub fn render_menu(&self) -> &'static str {
        self.role().menu()
    }

    /// Both fields must match exactly.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let c = self.credentials();
        c.username == username && c.password == password
    }

    pub fn as_teacher(&self) -> Option<&Teacher> {
        match self {
            Account::Teacher(_, t) => Some(t),
            _ => None,
        }
    }

    pub fn as_teacher_mut(&mut self) -> Option<&mut Teacher> {
        match self {
            Account::Teacher(_, t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_and_parse() {
        assert_eq!(Role::Administrator.to_string(), "admin");
        assert_eq!(Role::Teacher.to_string(), "teacher");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Administrator);
        assert_eq!(
            "Administrator".parse::<Role>().unwrap(),
            Role::Administrator
        );
        assert_eq!("STUDENT".parse::<Role>().unwrap(), Role::Student);
        assert!(matches!(
            "principal".parse::<Role>(),
            Err(ConfigError::UnknownRole(r)) if r == "principal"
        ));
    }

    #[test]
    fn menus_end_with_prompt() {
        for role in [Role::Administrator, Role::Teacher, Role::Student] {
            assert!(role.menu().ends_with("Enter choice: "));
        }
        assert!(Role::Administrator.menu().contains("5. Exit\n"));
        assert!(Role::Teacher.menu().contains("4. Exit\n"));
        assert!(Role::Student.menu().starts_with("Student Menu:\n1. View Test Schedule\n"));
    }

    #[test]
    fn account_accessors() {
        let account = Account::teacher("teacher1", "teacherpass");
        assert_eq!(account.username(), "teacher1");
        assert_eq!(account.password(), "teacherpass");
        assert_eq!(account.role(), Role::Teacher);
        assert_eq!(account.render_menu(), Role::Teacher.menu());
        assert!(account.as_teacher().is_some());
        assert!(Account::student("s", "p").as_teacher().is_none());
    }

    #[test]
    fn matches_requires_both_fields() {
        let account = Account::student("student1", "studentpass");
        assert!(account.matches("student1", "studentpass"));
        assert!(!account.matches("student1", "wrong"));
        assert!(!account.matches("Student1", "studentpass"));
    }

    #[test]
    fn debug_masks_password() {
        let creds = Credentials::new("admin1", "adminpass");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin1"));
        assert!(!rendered.contains("adminpass"));
    }

    #[test]
    fn create_test_appends_empty_test() {
        let mut teacher = Teacher::new();
        teacher.create_test("Math1");
        let created = teacher.create_test("Math1");
        assert_eq!(created.name(), "Math1");
        assert!(created.is_empty());
        assert_eq!(teacher.tests().len(), 2);
        assert_eq!(teacher.tests().last().map(|t| t.name()), Some("Math1"));
    }

    #[test]
    fn add_question_to_existing_test() {
        let mut teacher = Teacher::new();
        teacher.create_test("Math1");
        teacher
            .add_question("Math1", Question::new("2+2?", "4"))
            .unwrap();

        let test = teacher.find_test("Math1").unwrap();
        assert_eq!(test.len(), 1);
        assert!(test.questions()[0].check_answer("4"));
        assert!(!test.questions()[0].check_answer("5"));
    }

    #[test]
    fn add_question_with_duplicates_targets_first() {
        let mut teacher = Teacher::new();
        teacher.create_test("Quiz");
        teacher.create_test("Quiz");
        teacher.add_question("Quiz", Question::new("a", "b")).unwrap();
        assert_eq!(teacher.tests()[0].len(), 1);
        assert_eq!(teacher.tests()[1].len(), 0);
    }

    #[test]
    fn add_question_to_missing_test_leaves_state() {
        let mut teacher = Teacher::new();
        teacher.create_test("Math1");
        let before = teacher.tests().to_vec();

        let err = teacher
            .add_question("History", Question::new("q", "a"))
            .unwrap_err();
        assert_eq!(err, TestNotFound("History".into()));
        assert_eq!(teacher.tests(), before.as_slice());
    }
}
