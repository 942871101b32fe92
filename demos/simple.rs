use jsonc_conf::{Bind, Config, Record};

#[derive(Debug, Default)]
struct User {
    name: String,
    email: String,
    roles: Vec<String>,
}

impl Record for User {
    const FIELDS: &'static [&'static str] = &["Name", "Email", "Roles"];

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Bind> {
        match name {
            "Name" => Some(&mut self.name),
            "Email" => Some(&mut self.email),
            "Roles" => Some(&mut self.roles),
            _ => None,
        }
    }
}

fn main() {
    let config_data = r#"
        /* Users allowed to sign in */
        {
            // the only account for now
            "user": {
                "name": "John Doe",
                "email": "john.doe@example.com",
                "roles": ["admin"],
                "homepage": "http://example.com/~john"
            }
        }
    "#;

    let config = match Config::from_source(config_data, "example.json") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to parse configuration: {:?}", miette::Report::new(e));
            return;
        }
    };

    match config.get_as::<User>("/user") {
        Ok(user) => println!("Loaded user: {user:?}"),
        Err(e) => eprintln!("Failed to bind user: {e:?}"),
    }
}
