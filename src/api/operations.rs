//! GraphQL documents sent by the terminal client.

pub const GET_CLIENTS: &str = r#"
query getClients {
  clients {
    id
    name
    email
    phone
  }
}
"#;

pub const GET_PROJECTS: &str = r#"
query getProjects {
  projects {
    id
    name
    description
    status
    client {
      id
      name
      email
      phone
    }
  }
}
"#;

pub const GET_PROJECT: &str = r#"
query getProject($id: ID!) {
  project(id: $id) {
    id
    name
    description
    status
    client {
      id
      name
      email
      phone
    }
  }
}
"#;

pub const ADD_CLIENT: &str = r#"
mutation addClient($name: String!, $email: String!, $phone: String!) {
  addClient(name: $name, email: $email, phone: $phone) {
    id
    name
    email
    phone
  }
}
"#;

pub const DELETE_CLIENT: &str = r#"
mutation deleteClient($id: ID!) {
  deleteClient(id: $id) {
    id
    name
    email
    phone
  }
}
"#;

pub const ADD_PROJECT: &str = r#"
mutation addProject(
  $name: String!
  $description: String!
  $status: ProjectStatus!
  $clientId: ID!
) {
  addProject(
    name: $name
    description: $description
    status: $status
    clientId: $clientId
  ) {
    id
    name
    description
    status
    client {
      id
      name
      email
      phone
    }
  }
}
"#;

pub const UPDATE_PROJECT: &str = r#"
mutation updateProject(
  $id: ID!
  $name: String!
  $description: String!
  $status: ProjectStatusUpdate
) {
  updateProject(
    id: $id
    name: $name
    description: $description
    status: $status
  ) {
    id
    name
    description
    status
    client {
      id
      name
      email
      phone
    }
  }
}
"#;

pub const DELETE_PROJECT: &str = r#"
mutation deleteProject($id: ID!) {
  deleteProject(id: $id) {
    id
    name
    description
    status
    client {
      id
      name
      email
      phone
    }
  }
}
"#;
