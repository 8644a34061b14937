use axum::response::{Html, Json};
use serde_json::{json, Value};

pub async fn get_api_docs() -> Html<&'static str> {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Music Service API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body {
            margin: 0;
            background: #fafafa;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: '/docs/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#,
    )
}

fn pagination_params(default_limit: i64, limit_description: &str) -> Value {
    json!([
        {
            "name": "page",
            "in": "query",
            "required": false,
            "schema": { "type": "integer", "minimum": 1, "default": 1 },
            "description": "Page number"
        },
        {
            "name": "limit",
            "in": "query",
            "required": false,
            "schema": { "type": "integer", "minimum": 1, "default": default_limit },
            "description": limit_description
        }
    ])
}

fn filter_param(name: &str, description: &str, format: Option<&str>) -> Value {
    let mut schema = json!({ "type": "string" });
    if let Some(format) = format {
        schema["format"] = json!(format);
    }
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "schema": schema,
        "description": description
    })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
        }
    })
}

fn song_id_param() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" },
        "description": "Song ID"
    })
}

pub async fn get_openapi_spec() -> Json<Value> {
    Json(openapi_document())
}

pub fn openapi_document() -> Value {
    let mut list_params = vec![
        filter_param("groupName", "Group name (case-insensitive substring)", None),
        filter_param("song", "Song name (case-insensitive substring)", None),
        filter_param("releaseDate", "Exact release date", Some("date")),
        filter_param("text", "Lyrics (case-insensitive substring)", None),
        filter_param("link", "Link (case-insensitive substring)", None),
    ];
    if let Value::Array(params) = pagination_params(10, "Number of songs per page") {
        list_params.extend(params);
    }

    let mut verse_params = vec![song_id_param()];
    if let Value::Array(params) = pagination_params(2, "Number of verses per page") {
        verse_params.extend(params);
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Music Service API",
            "version": "1.0.0",
            "description": "Service to manage songs in a library"
        },
        "servers": [{ "url": "/", "description": "Current server" }],
        "tags": [{ "name": "songs", "description": "Song catalog operations" }],
        "paths": {
            "/songs": {
                "get": {
                    "tags": ["songs"],
                    "summary": "Get songs list with filtering and pagination",
                    "parameters": list_params,
                    "responses": {
                        "200": {
                            "description": "Songs retrieved successfully",
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/SongPage" } }
                            }
                        },
                        "400": error_response("Invalid page, limit or release date"),
                        "500": error_response("Failed to retrieve songs")
                    }
                },
                "post": {
                    "tags": ["songs"],
                    "summary": "Add a new song to the library",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/NewSong" } }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Song created successfully",
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/Song" } }
                            }
                        },
                        "400": error_response("Invalid input data"),
                        "500": error_response("Failed to store the song"),
                        "502": error_response("Failed to call external API")
                    }
                }
            },
            "/songs/{id}": {
                "put": {
                    "tags": ["songs"],
                    "summary": "Update song details; only provided fields are changed",
                    "parameters": [song_id_param()],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/SongPatch" } }
                        }
                    },
                    "responses": {
                        "200": { "description": "Song updated successfully" },
                        "400": error_response("Invalid JSON data"),
                        "404": error_response("Song not found"),
                        "500": error_response("Failed to update song")
                    }
                },
                "delete": {
                    "tags": ["songs"],
                    "summary": "Delete a song by ID",
                    "parameters": [song_id_param()],
                    "responses": {
                        "200": { "description": "Song deleted successfully" },
                        "404": error_response("Song not found"),
                        "500": error_response("Failed to delete song")
                    }
                }
            },
            "/songs/{id}/text": {
                "get": {
                    "tags": ["songs"],
                    "summary": "Get song text by verses with pagination",
                    "parameters": verse_params,
                    "responses": {
                        "200": {
                            "description": "Song text retrieved successfully",
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/VersePage" } }
                            }
                        },
                        "400": error_response("Invalid page or limit number"),
                        "404": error_response("Song not found or no verses on this page"),
                        "500": error_response("Failed to retrieve song text")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Song": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "group": { "type": "string" },
                        "song": { "type": "string" },
                        "releaseDate": { "type": "string", "format": "date" },
                        "text": { "type": "string" },
                        "link": { "type": "string" }
                    }
                },
                "NewSong": {
                    "type": "object",
                    "required": ["group", "song"],
                    "properties": {
                        "group": { "type": "string" },
                        "song": { "type": "string" }
                    }
                },
                "SongPatch": {
                    "type": "object",
                    "properties": {
                        "group": { "type": "string" },
                        "song": { "type": "string" },
                        "releaseDate": { "type": "string", "format": "date" },
                        "text": { "type": "string" },
                        "link": { "type": "string" }
                    }
                },
                "SongPage": {
                    "type": "object",
                    "properties": {
                        "page": { "type": "integer" },
                        "limit": { "type": "integer" },
                        "songs": { "type": "array", "items": { "$ref": "#/components/schemas/Song" } }
                    }
                },
                "VersePage": {
                    "type": "object",
                    "properties": {
                        "page": { "type": "integer" },
                        "limit": { "type": "integer" },
                        "verses": { "type": "array", "items": { "type": "string" } },
                        "total": { "type": "integer" }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}
