//! The `examgate init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("examgate.toml").exists() {
        println!("examgate.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write("examgate.toml", SAMPLE_CONFIG)?;
    println!("Created examgate.toml");

    println!("\nNext steps:");
    println!("  1. Edit examgate.toml with your accounts and tests");
    println!("  2. Run: examgate validate");
    println!("  3. Run: examgate");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examgate configuration

# When true, the administrator's Add User / Remove User actually change
# who can log in. When false they only print a confirmation.
admin_edits_directory = false

[[accounts]]
username = "admin1"
password = "adminpass"
role = "administrator"

[[accounts]]
username = "teacher1"
password = "teacherpass"
role = "teacher"

[[accounts.tests]]
name = "Math1"

[[accounts.tests.questions]]
prompt = "2+2?"
answer = "4"

[[accounts]]
username = "student1"
# Passwords may reference environment variables, e.g. "${STUDENT1_PASSWORD}".
password = "studentpass"
role = "student"
"#;
