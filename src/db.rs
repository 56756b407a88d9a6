use crate::Error;
use crate::photo::{NewPhoto, Photo};
use rocket::{fairing, Rocket, Build, tokio::fs};
use rocket_db_pools::{sqlx::{self, Sqlite, sqlite::SqliteRow, pool::PoolConnection}, sqlx::Row, Database};


#[derive(Database)]
#[database("halide")]
pub struct DB(pub sqlx::SqlitePool);


/// Fairing callback that checks if the database has already been filled with
/// the `photo` table and if not, executes `schema.sql` to initialize it
pub async fn init_schema(rocket: Rocket<Build>) -> fairing::Result {
    // Make sure the database pool has been initialized (fairings have been
    // attached in the correct order)
    let Some(db) = DB::fetch(&rocket) else {
        return Err(rocket);
    };
    let db = &db.0;

    // Check the `sqlite_master` table for a table named `photo`
    let query_result = sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name='photo';")
        .fetch_optional(db).await;
    match query_result {
        // The table already exists, nothing to do
        Ok(Some(_)) => Ok(rocket),

        // The table doesn't exist, try to import the schema to create it
        Ok(None) => {
            print!("Database is empty, creating schema... ");

            match fs::read_to_string("schema.sql").await {
                Ok(schema) => {
                    // Split the schema to import into individual queries
                    let sql_queries = schema.split(';').map(|s| s.trim()).filter(|s| !s.is_empty());
                    for sql_query in sql_queries {
                        if let Err(error) = sqlx::query(sql_query).execute(db).await {
                            println!("");
                            eprintln!("Error, unable to execute a query from schema.sql :");
                            eprintln!("{}", sql_query);
                            eprintln!("Result : {}", error);
                            return Err(rocket);
                        }
                    }
                    println!("success");
                    Ok(rocket)
                }
                Err(error) => {
                    println!("");
                    eprintln!("Error, unable to open \"schema.sql\" : {}", error);
                    Err(rocket)
                }
            }
        }

        // Something went wrong when checking `sqlite_master`
        Err(e) => {
            eprintln!("Error, unable to access database to check schema : {}", e);
            Err(rocket)
        }
    }
}


/// Get every photo in the database, most recently uploaded first. The id is
/// used as a tiebreak so photos inserted within the same second still come
/// back in reverse insertion order.
pub async fn get_all_photos(db_conn: &mut PoolConnection<Sqlite>) -> Result<Vec<Photo>, Error> {
    sqlx::query("SELECT * FROM photo ORDER BY upload_date DESC, id DESC;")
        .fetch_all(&mut **db_conn).await
        .map(|rows|
            // Convert the list of rows into a list of Photo's, excluding invalid rows from the result
            rows.iter()
                .filter_map(|row| -> Option<Photo> {
                    row_to_photo(row)
                        .map_err(|e| eprintln!("Warning : database error : unable to decode a photo : {}", e))
                        .ok()
                })
                .collect::<Vec<Photo>>()
        )
        .map_err(|e| Error::DatabaseError(e))
}


/// Insert a single photo into the database and return its assigned id.
/// The `upload_date` is set by the database, not the caller.
pub async fn insert_photo(db_conn: &mut PoolConnection<Sqlite>, photo: &NewPhoto) -> Result<i64, Error> {
    sqlx::query("INSERT INTO photo(filename, image_url, category, tags) VALUES (?, ?, ?, ?);")
        .bind(&photo.filename)
        .bind(&photo.image_url)
        .bind(&photo.category)
        .bind(&photo.tags)
        .execute(&mut **db_conn).await
        .map(|result| result.last_insert_rowid())
        .map_err(|e| Error::DatabaseError(e))
}


/// Deserialize an SQL row into a Photo struct, based on the column order
/// defined in schema.sql
fn row_to_photo(row: &SqliteRow) -> Result<Photo, sqlx::Error> {
    Ok(Photo {
        id: row.try_get(0)?,
        filename: row.try_get(1)?,
        image_url: row.try_get(2)?,
        upload_date: row.try_get(3)?,
        category: row.try_get(4)?,
        tags: row.try_get(5)?,
    })
}
